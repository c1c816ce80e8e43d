use super::{SessionError, SessionResult, SessionStore};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// In-memory session storage (lives as long as the host)
///
/// Pinned keys never expire and are never evicted.
#[derive(Debug, Default)]
pub struct InMemorySession {
    data: RwLock<HashMap<String, (Value, Instant)>>,
    pinned: RwLock<HashSet<String>>,
    ttl: Option<Duration>,
    max_size: Option<usize>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire entries `ttl` after their last write
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_pinned(self, key: &str) -> Self {
        self.pin(key);
        self
    }

    pub fn is_pinned(&self, key: &str) -> bool {
        self.pinned
            .read()
            .map(|pinned| pinned.contains(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        let pinned = self
            .pinned
            .read()
            .map(|pinned| pinned.clone())
            .unwrap_or_default();
        self.data
            .read()
            .map(|data| {
                data.iter()
                    .filter(|(key, (_, at))| self.is_live(pinned.contains(*key), *at))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_live(&self, pinned: bool, written_at: Instant) -> bool {
        match self.ttl {
            Some(ttl) => pinned || written_at.elapsed() < ttl,
            None => true,
        }
    }

    fn poisoned<T>(_: T) -> SessionError {
        SessionError::Storage("session lock poisoned".to_string())
    }
}

impl SessionStore for InMemorySession {
    fn get(&self, key: &str) -> Option<Value> {
        let pinned = self.is_pinned(key);
        let data = self.data.read().ok()?;
        match data.get(key) {
            Some((value, written_at)) if self.is_live(pinned, *written_at) => Some(value.clone()),
            _ => None,
        }
    }

    fn set(&self, key: &str, value: Value) -> SessionResult<()> {
        let pinned = self.pinned.read().map_err(Self::poisoned)?;
        let mut data = self.data.write().map_err(Self::poisoned)?;
        data.insert(key.to_string(), (value, Instant::now()));

        if let Some(ttl) = self.ttl {
            data.retain(|key, (_, written_at)| written_at.elapsed() < ttl || pinned.contains(key));
        }

        if let Some(max_size) = self.max_size {
            // Remove oldest unpinned entries
            let mut entries: Vec<_> = data
                .iter()
                .filter(|(key, _)| !pinned.contains(*key))
                .map(|(key, (_, at))| (key.clone(), *at))
                .collect();
            let overflow = data.len().saturating_sub(max_size).min(entries.len());
            entries.sort_by_key(|(_, at)| *at);
            for (key, _) in entries.into_iter().take(overflow) {
                data.remove(&key);
            }
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> SessionResult<()> {
        let mut data = self.data.write().map_err(Self::poisoned)?;
        data.remove(key);
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        let mut data = self.data.write().map_err(Self::poisoned)?;
        data.clear();
        Ok(())
    }

    fn pin(&self, key: &str) {
        let mut pinned = self
            .pinned
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        pinned.insert(key.to_string());
    }
}
