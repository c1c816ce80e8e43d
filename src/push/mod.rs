//! Collection stream adapter
//!
//! A [`Pusher`] is bound to one host. Each [`Pusher::push`] call records the
//! selector in the host's session load-log and returns a fresh
//! [`PushStream`] that is fed every record of the selected collection.
//!
//! # Examples
//! ```
//! use futures_util::StreamExt;
//! use serde_json::json;
//! use std::sync::Arc;
//! use template_push::{Pusher, Template};
//!
//! # async fn example() -> Result<(), template_push::PushError> {
//! let app = Arc::new(Template::new());
//! app.add("pages", "about", json!({"path": "about.hbs", "content": "About"}));
//!
//! let pusher = Pusher::from_host(app)?;
//! let files = pusher.push("pages")?.collect::<Vec<_>>().await;
//! assert_eq!(files.len(), 1);
//! assert_eq!(pusher.loaded(), vec![json!("pages")]);
//! # Ok(())
//! # }
//! ```

mod drain;
pub mod stream;
pub mod writer;

pub use stream::{PushStream, StreamState};
pub use writer::PushWriter;

use crate::config::PushConfig;
use crate::error::{PushError, PushResult};
use crate::file::FileObject;
use crate::host::Host;
use crate::normalize::{Normalize, VinylNormalizer};
use crate::schema_validation::RecordValidator;
use crate::selector::Selector;
use crate::session::{LoadLog, SessionStore};
use drain::{Drain, Origin};
use futures_util::stream::BoxStream;
use serde_json::Value;
use std::sync::Arc;
use stream::SharedState;
use uuid::Uuid;

/// Stream of file objects as produced by a push and its pipe stages
pub type FileStream = BoxStream<'static, PushResult<FileObject>>;

/// Factory for push streams, bound to one host
#[derive(Clone)]
pub struct Pusher {
    host: Arc<dyn Host>,
    session: Arc<dyn SessionStore>,
    normalizer: Arc<dyn Normalize>,
    validator: Option<RecordValidator>,
    config: PushConfig,
}

impl Pusher {
    /// Bind a pusher to `host`.
    ///
    /// Fails with [`PushError::InvalidHost`] when no host is given or the host
    /// exposes no collection storage.
    pub fn new(host: Option<Arc<dyn Host>>) -> PushResult<Self> {
        let host = host.ok_or_else(|| PushError::InvalidHost("no host given".to_string()))?;
        if host.views().is_none() {
            return Err(PushError::InvalidHost(
                "host exposes no collection storage".to_string(),
            ));
        }

        let session = host.session();
        Ok(Self {
            host,
            session,
            normalizer: Arc::new(VinylNormalizer::new()),
            validator: None,
            config: PushConfig::default(),
        })
    }

    pub fn from_host<H>(host: Arc<H>) -> PushResult<Self>
    where
        H: Host + 'static,
    {
        Self::new(Some(host as Arc<dyn Host>))
    }

    /// Apply a configuration; strict mode compiles the document schema
    pub fn with_config(mut self, config: PushConfig) -> PushResult<Self> {
        self.validator = match (config.strict_records, self.validator.take()) {
            (false, _) => None,
            (true, Some(validator)) => Some(validator),
            (true, None) => Some(RecordValidator::document()?),
        };
        self.config = config;
        Ok(self)
    }

    /// Validate records against a custom schema (enables strict mode)
    pub fn with_validator(mut self, validator: RecordValidator) -> Self {
        self.validator = Some(validator);
        self.config.strict_records = true;
        self
    }

    pub fn with_normalizer<N>(mut self, normalizer: N) -> Self
    where
        N: Normalize + 'static,
    {
        self.normalizer = Arc::new(normalizer);
        self
    }

    /// Record loads in `session` instead of the host's own session
    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = session;
        self
    }

    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    pub fn load_log(&self) -> LoadLog<'_> {
        LoadLog::new(self.session.as_ref(), &self.config.load_log_key)
    }

    /// Every selector pushed so far, in call order
    pub fn loaded(&self) -> Vec<Value> {
        self.load_log().entries()
    }

    /// Create a stream fed with every record of `selector`.
    ///
    /// The selector is appended to the load-log before the stream exists. A
    /// name the host does not know yields an empty collection. Draining starts
    /// when the returned stream is first polled.
    pub fn push(&self, selector: impl Into<Selector>) -> PushResult<PushStream> {
        let selector = selector.into();
        let logged = self.load_log().append(selector.to_log_entry())?;

        let stream_id = Uuid::new_v4();
        let origin = match selector {
            Selector::Name(name) => {
                log::debug!(
                    "Stream {}: pushing collection `{}` ({} loads)",
                    stream_id,
                    name,
                    logged
                );
                Origin::Named {
                    host: Arc::clone(&self.host),
                    name,
                }
            }
            Selector::Collection(records) => {
                log::debug!(
                    "Stream {}: pushing {} inline records ({} loads)",
                    stream_id,
                    records.len(),
                    logged
                );
                Origin::Inline(records)
            }
        };

        let drain = Drain {
            stream_id,
            origin,
            normalizer: Arc::clone(&self.normalizer),
            validator: self.validator.clone(),
            yield_every: self.config.yield_every,
            state: SharedState::new(),
        };
        Ok(PushStream::new(drain, self.config.write_buffer))
    }

    /// Like [`Pusher::push`], for selectors of unknown JSON shape.
    ///
    /// Anything but a string or an object fails with
    /// [`PushError::InvalidSelector`] and leaves the load-log untouched.
    pub fn push_value(&self, selector: Value) -> PushResult<PushStream> {
        self.push(Selector::try_from(selector)?)
    }
}

impl std::fmt::Debug for Pusher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pusher")
            .field("config", &self.config)
            .field("validator", &self.validator)
            .finish()
    }
}
