//! Host collaborators
//!
//! The pusher only ever reads from a host: it looks collections up through
//! [`Host::views`] and records selectors in [`Host::session`]. [`Template`]
//! is a small in-memory host for applications that do not bring their own.

use crate::session::{InMemorySession, SessionStore};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Document records keyed by document name
pub type Collection = Map<String, Value>;

/// Read access to a host's named collections
pub trait ViewStore: Send + Sync {
    /// Snapshot of the named collection, if it exists
    fn collection(&self, name: &str) -> Option<Collection>;

    fn names(&self) -> Vec<String>;
}

/// The application a pusher is bound to
pub trait Host: Send + Sync {
    /// Collection storage; `None` when the host has none
    fn views(&self) -> Option<&dyn ViewStore>;

    fn session(&self) -> Arc<dyn SessionStore>;
}

/// In-memory collection storage
#[derive(Debug, Default)]
pub struct Views {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl Views {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&BTreeMap<String, Collection>) -> R) -> R {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&collections)
    }

    fn write<R>(&self, f: impl FnOnce(&mut BTreeMap<String, Collection>) -> R) -> R {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut collections)
    }
}

impl ViewStore for Views {
    fn collection(&self, name: &str) -> Option<Collection> {
        self.read(|collections| collections.get(name).cloned())
    }

    fn names(&self) -> Vec<String> {
        self.read(|collections| collections.keys().cloned().collect())
    }
}

/// In-memory host with named collections and a session
pub struct Template {
    views: Option<Views>,
    session: Arc<dyn SessionStore>,
}

impl Template {
    pub fn new() -> Self {
        Self {
            views: Some(Views::new()),
            session: Arc::new(InMemorySession::new()),
        }
    }

    /// A host exposing no collection storage
    pub fn without_views() -> Self {
        Self {
            views: None,
            session: Arc::new(InMemorySession::new()),
        }
    }

    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = session;
        self
    }

    /// Create an empty collection unless it already exists
    pub fn create(&self, name: &str) {
        if let Some(views) = &self.views {
            views.write(|collections| {
                collections.entry(name.to_string()).or_default();
            });
        }
    }

    /// Add (or replace) one record in a collection, creating it if needed
    pub fn add(&self, collection: &str, key: &str, record: Value) {
        if let Some(views) = &self.views {
            views.write(|collections| {
                collections
                    .entry(collection.to_string())
                    .or_default()
                    .insert(key.to_string(), record);
            });
        }
    }

    /// Add many records to a collection at once
    pub fn load<I, K>(&self, collection: &str, entries: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        if let Some(views) = &self.views {
            views.write(|collections| {
                let target = collections.entry(collection.to_string()).or_default();
                for (key, record) in entries {
                    target.insert(key.into(), record);
                }
            });
        }
    }

    /// Remove a collection, returning it if it existed
    pub fn remove(&self, collection: &str) -> Option<Collection> {
        self.views
            .as_ref()
            .and_then(|views| views.write(|collections| collections.remove(collection)))
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for Template {
    fn views(&self) -> Option<&dyn ViewStore> {
        self.views.as_ref().map(|views| views as &dyn ViewStore)
    }

    fn session(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.session)
    }
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("views", &self.views.as_ref().map(|views| views.names()))
            .finish()
    }
}
