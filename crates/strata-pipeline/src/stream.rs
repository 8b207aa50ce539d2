use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::EgressError;

/// Single-pass byte stream produced by a cat call.
///
/// Items are `Ok(chunk)` in stored order; at most one `Err` is yielded,
/// after which the stream is spent. Dropping the stream cancels the
/// producer, which stops issuing block store reads.
pub struct CatStream {
    inner: ReceiverStream<Result<Bytes, EgressError>>,
}

impl CatStream {
    pub(crate) fn new(rx: mpsc::Receiver<Result<Bytes, EgressError>>) -> Self {
        Self {
            inner: ReceiverStream::new(rx),
        }
    }
}

impl Stream for CatStream {
    type Item = Result<Bytes, EgressError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

impl std::fmt::Debug for CatStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatStream").finish_non_exhaustive()
    }
}
