use super::drain::Drain;
use super::writer::PushWriter;
use super::FileStream;
use crate::error::{PushError, PushResult};
use crate::file::FileObject;
use crate::pipe::Pipe;
use async_stream::stream;
use futures_core::Stream;
use futures_util::stream::SelectAll;
use futures_util::StreamExt;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, WeakSender};
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

/// Lifecycle of a push stream
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Returned to the caller, nothing drained yet
    Created = 0,
    Draining = 1,
    /// Collection drained, external input still open
    Ending = 2,
    Ended = 3,
    /// An error was emitted; nothing follows it
    Failed = 4,
    /// Destroyed by the consumer before the end
    Destroyed = 5,
}

impl StreamState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StreamState::Ended | StreamState::Failed | StreamState::Destroyed
        )
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => StreamState::Created,
            1 => StreamState::Draining,
            2 => StreamState::Ending,
            3 => StreamState::Ended,
            4 => StreamState::Failed,
            _ => StreamState::Destroyed,
        }
    }
}

/// State shared between a stream and its drain
#[derive(Debug, Clone)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicU8::new(StreamState::Created as u8)))
    }

    pub(crate) fn get(&self) -> StreamState {
        StreamState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move to `next` unless a terminal state was already reached
    pub(crate) fn advance(&self, next: StreamState) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if StreamState::from_u8(current).is_terminal() {
                    None
                } else {
                    Some(next as u8)
                }
            });
    }
}

/// Duplex pass-through stream returned by [`Pusher::push`](super::Pusher::push).
///
/// Yields the drained collection interleaved with anything written through a
/// [`PushWriter`] or merged with [`PushStream::pipe_from`]. It ends once the
/// drain and every external source have ended. The first error is yielded
/// once and terminates the stream.
pub struct PushStream {
    id: Uuid,
    sources: Option<SelectAll<FileStream>>,
    external: WeakSender<FileObject>,
    state: SharedState,
}

impl PushStream {
    /// `write_buffer` bounds how many written files wait for the consumer
    pub(crate) fn new(drain: Drain, write_buffer: usize) -> Self {
        let id = drain.stream_id;
        let state = drain.state.clone();
        let (tx, rx) = mpsc::channel(write_buffer.max(1));
        let external = tx.downgrade();

        let mut sources = SelectAll::new();
        sources.push(drain.into_stream(tx));
        sources.push(ReceiverStream::new(rx).map(Ok).boxed());

        Self {
            id,
            sources: Some(sources),
            external,
            state,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> StreamState {
        self.state.get()
    }

    /// Whether external input is still accepted
    pub fn is_writable(&self) -> bool {
        self.sources.is_some() && self.external.upgrade().is_some()
    }

    /// Register an external source of files.
    ///
    /// The stream does not end while the writer is open. Fails once the
    /// drain and every other writer have already ended.
    pub fn writer(&self) -> PushResult<PushWriter> {
        if self.sources.is_none() {
            return Err(PushError::StreamEnded);
        }
        self.external
            .upgrade()
            .map(|tx| PushWriter::new(tx, self.id))
            .ok_or(PushError::StreamEnded)
    }

    /// Merge an upstream of files into this stream
    pub fn pipe_from<S>(&mut self, upstream: S) -> PushResult<()>
    where
        S: Stream<Item = FileObject> + Send + 'static,
    {
        let keepalive = self.external.upgrade().ok_or(PushError::StreamEnded)?;
        let sources = self.sources.as_mut().ok_or(PushError::StreamEnded)?;
        let id = self.id;

        sources.push(
            stream! {
                let _keepalive = keepalive;
                for await file in upstream {
                    yield Ok(file);
                }
                log::trace!("Stream {}: upstream ended", id);
            }
            .boxed(),
        );
        Ok(())
    }

    /// Chain a pipe stage onto this stream
    pub fn pipe(self, stage: &Pipe) -> FileStream {
        stage.apply(self.boxed())
    }

    /// Stop emitting. Pending records and external input are discarded.
    pub fn destroy(&mut self) {
        if self.sources.take().is_some() {
            self.state.advance(StreamState::Destroyed);
            log::debug!("Stream {}: destroyed", self.id);
        }
    }
}

impl Stream for PushStream {
    type Item = PushResult<FileObject>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(sources) = this.sources.as_mut() else {
            return Poll::Ready(None);
        };

        match sources.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(file))) => Poll::Ready(Some(Ok(file))),
            Poll::Ready(Some(Err(error))) => {
                log::warn!("Stream {}: {}", this.id, error);
                this.state.advance(StreamState::Failed);
                this.sources = None;
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(None) => {
                this.state.advance(StreamState::Ended);
                this.sources = None;
                log::debug!("Stream {}: ended", this.id);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for PushStream {
    fn drop(&mut self) {
        if !self.state.get().is_terminal() {
            self.destroy();
        }
    }
}

impl std::fmt::Debug for PushStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushStream")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("sources", &self.sources.as_ref().map(SelectAll::len))
            .finish()
    }
}
