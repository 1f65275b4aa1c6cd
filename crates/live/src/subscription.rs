//! Consumer handle for a live query.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A handle to a running live query.
///
/// Updates arrive in publication order via [`recv`](Subscription::recv) or
/// the [`Stream`] impl. [`cancel`](Subscription::cancel) detaches the
/// subscription synchronously: once it returns, no further update is
/// delivered, even if the worker task has not yet observed the cancellation.
/// Dropping the handle cancels it as well.
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
    cancel: CancellationToken,
}

impl<T> Subscription<T> {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<T>, cancel: CancellationToken) -> Self {
        Self { rx, cancel }
    }

    /// Receive the next update, or `None` once the subscription is
    /// cancelled or the query worker has stopped.
    pub async fn recv(&mut self) -> Option<T> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.rx.recv().await
    }

    /// Stop the subscription. The channel is closed and drained before
    /// returning, so anything the worker sent but the consumer never read
    /// is discarded here rather than delivered later.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.cancel.is_cancelled() {
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
