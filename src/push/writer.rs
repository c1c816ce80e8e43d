use crate::error::{PushError, PushResult};
use crate::file::FileObject;
use futures::Sink;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::PollSender;
use uuid::Uuid;

/// Writable side of a [`PushStream`](super::PushStream).
///
/// Each writer (and each clone) is one external source; the stream ends only
/// after all of them have ended. Dropping a writer ends it. Writes go through
/// a bounded buffer, so a writer waits while the consumer falls behind.
#[derive(Clone)]
pub struct PushWriter {
    tx: Option<PollSender<FileObject>>,
    stream_id: Uuid,
}

impl PushWriter {
    pub(crate) fn new(tx: Sender<FileObject>, stream_id: Uuid) -> Self {
        Self {
            tx: Some(PollSender::new(tx)),
            stream_id,
        }
    }

    fn sender(&self) -> PushResult<&Sender<FileObject>> {
        self.tx
            .as_ref()
            .and_then(PollSender::get_ref)
            .ok_or(PushError::StreamEnded)
    }

    /// Forward a file downstream unchanged, waiting for buffer space
    pub async fn write(&self, file: FileObject) -> PushResult<()> {
        let tx = self.sender()?;
        tx.send(file).await.map_err(|_| PushError::StreamEnded)
    }

    /// Forward a file without waiting; fails with [`PushError::WriterFull`]
    /// when the buffer is full
    pub fn try_write(&self, file: FileObject) -> PushResult<()> {
        let tx = self.sender()?;
        tx.try_send(file).map_err(|e| match e {
            TrySendError::Full(_) => PushError::WriterFull,
            TrySendError::Closed(_) => PushError::StreamEnded,
        })
    }

    /// Signal that this source has no more files
    pub fn end(mut self) {
        self.close();
    }

    pub fn is_open(&self) -> bool {
        self.sender().map(|tx| !tx.is_closed()).unwrap_or(false)
    }

    pub fn stream_id(&self) -> Uuid {
        self.stream_id
    }

    fn close(&mut self) {
        if self.tx.take().is_some() {
            log::trace!("Stream {}: writer ended", self.stream_id);
        }
    }
}

impl Sink<FileObject> for PushWriter {
    type Error = PushError;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self.get_mut().tx.as_mut() {
            Some(tx) => tx.poll_reserve(cx).map_err(|_| PushError::StreamEnded),
            None => Poll::Ready(Err(PushError::StreamEnded)),
        }
    }

    fn start_send(self: Pin<&mut Self>, item: FileObject) -> Result<(), Self::Error> {
        let tx = self.get_mut().tx.as_mut().ok_or(PushError::StreamEnded)?;
        tx.send_item(item).map_err(|_| PushError::StreamEnded)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.get_mut().close();
        Poll::Ready(Ok(()))
    }
}

impl std::fmt::Debug for PushWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushWriter")
            .field("stream_id", &self.stream_id)
            .field("open", &self.is_open())
            .finish()
    }
}
