//! Byte-counting stream used to observe transfer progress.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use tokio::sync::watch;

/// Default chunk size used when splitting an in-memory payload (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

pin_project! {
    /// Wraps a byte stream and publishes the running byte count on a
    /// [`watch`] channel every time a chunk is handed to the consumer.
    pub struct ProgressStream<S> {
        #[pin]
        inner: S,
        sent: u64,
        tx: watch::Sender<u64>,
    }
}

impl<S> ProgressStream<S> {
    /// Wrap `inner`, returning the stream and a receiver of bytes sent so far.
    pub fn new(inner: S) -> (Self, watch::Receiver<u64>) {
        let (tx, rx) = watch::channel(0);
        (Self { inner, sent: 0, tx }, rx)
    }
}

impl<S, E> Stream for ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let polled = this.inner.poll_next(cx);
        if let Poll::Ready(Some(Ok(chunk))) = &polled {
            *this.sent += chunk.len() as u64;
            this.tx.send_replace(*this.sent);
        }
        polled
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Split an in-memory payload into a stream of chunks.
pub fn chunked(
    data: Bytes,
    chunk_size: usize,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let chunk_size = chunk_size.max(1);
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect();
    futures::stream::iter(chunks.into_iter().map(Ok))
}

/// Fraction of `total` covered by `sent`, clamped to `0.0..=1.0`.
pub fn fraction(sent: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (sent as f64 / total as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_counts_bytes() {
        let data = Bytes::from(vec![7u8; 10]);
        let (stream, rx) = ProgressStream::new(chunked(data, 4));
        let chunks: Vec<_> = stream.collect().await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].as_ref().unwrap().len(), 2);
        assert_eq!(*rx.borrow(), 10);
    }

    #[test]
    fn test_fraction() {
        assert_eq!(fraction(0, 0), 1.0);
        assert_eq!(fraction(5, 10), 0.5);
        assert_eq!(fraction(20, 10), 1.0);
    }
}
