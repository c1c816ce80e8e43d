//! Error types for the push adapter
//!
//! Construction and selector errors are returned synchronously from the
//! adapter; everything else reaches the consumer as an `Err` item on the
//! returned stream.

use crate::normalize::NormalizeError;
use crate::schema_validation::SchemaError;
use crate::session::SessionError;

/// Main error type for push operations
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// Host is missing or exposes no view storage
    #[error("Invalid host: {0}")]
    InvalidHost(String),

    /// Selector is neither a collection name nor an object of records
    #[error("Invalid selector: expected a collection name or an object, found {found}")]
    InvalidSelector { found: &'static str },

    /// A record could not be turned into a file object
    #[error("Failed to normalize record `{key}`: {source}")]
    Normalize {
        key: String,
        #[source]
        source: NormalizeError,
    },

    /// A record was rejected by the strict record schema
    #[error("Record `{key}` failed validation: {source}")]
    Validation {
        key: String,
        #[source]
        source: SchemaError,
    },

    /// The record schema could not be compiled
    #[error("Record schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The session store refused the load-log write
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The stream has terminated and no longer accepts writes
    #[error("Stream no longer accepts writes")]
    StreamEnded,

    /// The write buffer is full; retry once the consumer catches up
    #[error("Stream write buffer is full")]
    WriterFull,
}

impl PushError {
    /// Errors that surface on the stream rather than from the call itself
    pub fn is_stream_error(&self) -> bool {
        matches!(
            self,
            PushError::Normalize { .. }
                | PushError::Validation { .. }
                | PushError::StreamEnded
                | PushError::WriterFull
        )
    }
}

/// Result type for push operations
pub type PushResult<T> = Result<T, PushError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_errors() {
        assert!(PushError::StreamEnded.is_stream_error());
        assert!(PushError::WriterFull.is_stream_error());
        assert!(!PushError::InvalidHost("none".to_string()).is_stream_error());
        assert!(!PushError::InvalidSelector { found: "null" }.is_stream_error());
    }
}
