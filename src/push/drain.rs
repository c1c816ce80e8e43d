//! The deferred collection drain feeding a push stream

use super::stream::SharedState;
use super::{FileStream, StreamState};
use crate::error::PushError;
use crate::file::FileObject;
use crate::host::{Collection, Host};
use crate::normalize::Normalize;
use crate::schema_validation::RecordValidator;
use async_stream::stream;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

/// Where the drained records come from
pub(crate) enum Origin {
    /// Looked up on the host when draining starts; missing means empty
    Named {
        host: Arc<dyn Host>,
        name: String,
    },
    Inline(Collection),
}

impl Origin {
    fn resolve(self) -> Collection {
        match self {
            Origin::Named { host, name } => host
                .views()
                .and_then(|views| views.collection(&name))
                .unwrap_or_default(),
            Origin::Inline(records) => records,
        }
    }
}

pub(crate) struct Drain {
    pub(crate) stream_id: Uuid,
    pub(crate) origin: Origin,
    pub(crate) normalizer: Arc<dyn Normalize>,
    pub(crate) validator: Option<RecordValidator>,
    pub(crate) yield_every: usize,
    pub(crate) state: SharedState,
}

impl Drain {
    /// Lazily drain every record as a file object.
    ///
    /// Nothing runs until the stream is first polled. `keepalive` holds the
    /// external input channel open until the drain is finished, so writers
    /// registered before then are never cut off.
    pub(crate) fn into_stream(self, keepalive: Sender<FileObject>) -> FileStream {
        let Drain {
            stream_id,
            origin,
            normalizer,
            validator,
            yield_every,
            state,
        } = self;
        let yield_every = yield_every.max(1);

        stream! {
            let _keepalive = keepalive;
            state.advance(StreamState::Draining);

            let records = origin.resolve();
            log::debug!("Stream {}: draining {} records", stream_id, records.len());

            for (index, (key, record)) in records.into_iter().enumerate() {
                if index > 0 && index % yield_every == 0 {
                    tokio::task::yield_now().await;
                }

                if let Some(validator) = &validator {
                    if let Err(source) = validator.validate(&record) {
                        yield Err(PushError::Validation { key, source });
                        return;
                    }
                }

                match normalizer.normalize(&record) {
                    Ok(file) => {
                        log::trace!("Stream {}: emitting `{}`", stream_id, key);
                        yield Ok(file);
                    }
                    Err(source) => {
                        yield Err(PushError::Normalize { key, source });
                        return;
                    }
                }
            }

            state.advance(StreamState::Ending);
            log::debug!("Stream {}: collection drained", stream_id);
        }
        .boxed()
    }
}
