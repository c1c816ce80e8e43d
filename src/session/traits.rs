use serde_json::Value;

/// Key-value store backing a host session (object-safe)
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> SessionResult<()>;
    fn delete(&self, key: &str) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;

    fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Exempt `key` from expiry and eviction. Stores without either ignore it.
    fn pin(&self, _key: &str) {}
}

/// Session error types
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
