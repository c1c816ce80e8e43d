use super::{SessionResult, SessionStore};
use serde_json::Value;

/// Session key the load-log lives under unless configured otherwise
pub const DEFAULT_LOAD_LOG_KEY: &str = "loaded";

/// Append-only record of every selector requested through a pusher.
///
/// Stored in the session as a JSON array. Appends are read-modify-write and
/// pin the key so the store never expires or evicts the log.
pub struct LoadLog<'a> {
    store: &'a dyn SessionStore,
    key: &'a str,
}

impl<'a> LoadLog<'a> {
    pub fn new(store: &'a dyn SessionStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// Current entries, oldest first. A missing log reads as empty.
    pub fn entries(&self) -> Vec<Value> {
        match self.store.get(self.key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                log::warn!(
                    "Session key `{}` holds a non-list value ({}); starting a fresh load-log",
                    self.key,
                    crate::normalize::kind_of(&other)
                );
                Vec::new()
            }
        }
    }

    /// Append one entry and return the new length
    pub fn append(&self, entry: Value) -> SessionResult<usize> {
        self.store.pin(self.key);
        let mut entries = self.entries();
        entries.push(entry);
        let len = entries.len();
        self.store.set(self.key, Value::Array(entries))?;
        Ok(len)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemorySession;
    use serde_json::json;

    #[test]
    fn test_append_accumulates_in_order() {
        let store = InMemorySession::new();
        let log = LoadLog::new(&store, DEFAULT_LOAD_LOG_KEY);
        assert!(log.is_empty());

        assert_eq!(log.append(json!("pages")).unwrap(), 1);
        assert_eq!(log.append(json!({"a": {"path": "a.md"}})).unwrap(), 2);
        assert_eq!(log.append(json!("pages")).unwrap(), 3);

        assert_eq!(
            log.entries(),
            vec![json!("pages"), json!({"a": {"path": "a.md"}}), json!("pages")]
        );
    }

    #[test]
    fn test_log_survives_eviction() {
        let store = InMemorySession::new().with_max_size(1);
        let log = LoadLog::new(&store, "loaded");

        log.append(json!("a")).unwrap();
        store.set("user", json!(1)).unwrap();
        log.append(json!("b")).unwrap();

        assert_eq!(log.entries(), vec![json!("a"), json!("b")]);
        assert!(store.is_pinned("loaded"));
    }

    #[test]
    fn test_non_list_value_is_reset() {
        let store = InMemorySession::new();
        store.set("loaded", json!("oops")).unwrap();
        let log = LoadLog::new(&store, "loaded");
        assert!(log.entries().is_empty());
        log.append(json!("posts")).unwrap();
        assert_eq!(store.get("loaded"), Some(json!(["posts"])));
    }
}
