//! Cooperative cancellation for an in-flight batch run.
//!
//! A [`CancelToken`] is cloned into whatever wants to stop the run (a
//! Ctrl-C handler, a UI close button) and checked by the fetch loop at
//! every suspension point. Cancellation is edge-triggered and permanent:
//! once cancelled, a token stays cancelled.

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// A cloneable cancellation flag with an awaitable edge.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags the token as cancelled and wakes every waiter.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves when the token is cancelled; pends forever otherwise.
    ///
    /// Intended for `tokio::select!` arms racing against a lookup or a
    /// delay sleep.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            let mut notified = pin!(self.inner.notify.notified());
            // Register interest before re-reading the flag, otherwise a
            // cancel() landing between the check and the await is lost.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_is_visible_to_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        token.cancel();
        assert!(clone.is_cancelled());
        // Await must resolve immediately on an already-cancelled token.
        clone.cancelled().await;
    }

    #[tokio::test]
    async fn wakes_a_pending_waiter() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        tokio::task::yield_now().await;
        token.cancel();
        handle.await.unwrap();
    }
}
