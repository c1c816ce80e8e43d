//! Configuration for push operations

use crate::session::DEFAULT_LOAD_LOG_KEY;
use serde::{Deserialize, Serialize};

/// Configuration for a [`Pusher`](crate::push::Pusher)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Session key the load-log is stored under
    pub load_log_key: String,
    /// Yield to the scheduler after this many drained records
    pub yield_every: usize,
    /// Validate every record against the document schema before normalizing
    pub strict_records: bool,
    /// Files a stream buffers from writers before they have to wait
    pub write_buffer: usize,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            load_log_key: DEFAULT_LOAD_LOG_KEY.to_string(),
            yield_every: 64,
            strict_records: false,
            write_buffer: 64,
        }
    }
}

impl PushConfig {
    /// Create a new push configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session key used for the load-log
    pub fn load_log_key(mut self, key: impl Into<String>) -> Self {
        self.load_log_key = key.into();
        self
    }

    /// Set how many records are drained between cooperative yields (minimum 1)
    pub fn yield_every(mut self, records: usize) -> Self {
        self.yield_every = records.max(1);
        self
    }

    /// Set how many written files are buffered ahead of the consumer (minimum 1)
    pub fn write_buffer(mut self, files: usize) -> Self {
        self.write_buffer = files.max(1);
        self
    }

    /// Require every record to match the document schema
    pub fn strict_records(mut self, strict: bool) -> Self {
        self.strict_records = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builder() {
        let config = PushConfig::default();
        assert_eq!(config.load_log_key, "loaded");
        assert!(!config.strict_records);

        let config = PushConfig::new()
            .load_log_key("pushed")
            .yield_every(0)
            .write_buffer(0)
            .strict_records(true);
        assert_eq!(config.load_log_key, "pushed");
        assert_eq!(config.yield_every, 1);
        assert_eq!(config.write_buffer, 1);
        assert!(config.strict_records);
    }

    #[test]
    fn test_partial_json_config() {
        let config: PushConfig = serde_json::from_str(r#"{"strict_records": true}"#).unwrap();
        assert_eq!(config.load_log_key, "loaded");
        assert_eq!(config.yield_every, 64);
        assert_eq!(config.write_buffer, 64);
        assert!(config.strict_records);
    }
}
