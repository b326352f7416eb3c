// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::subscribe::{SubscribeExt, SubscriptionOutcome};
use core::future::Future;
use rxsensor_core::{CancellableStream, CancellationToken, SensorError, StreamItem};
use tokio::task::{JoinError, JoinHandle};

/// A subscription running on the tokio runtime.
///
/// Dropping the task cancels the subscription.
pub struct SubscriptionTask {
    cancellation_token: CancellationToken,
    handle: Option<JoinHandle<SubscriptionOutcome>>,
}

impl SubscriptionTask {
    /// Request cancellation. The stream's listener is deregistered by the task itself.
    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the subscription to end.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] if the task panicked or was aborted.
    pub async fn join(mut self) -> Result<SubscriptionOutcome, JoinError> {
        match self.handle.take() {
            Some(handle) => handle.await,
            None => Ok(SubscriptionOutcome::Cancelled),
        }
    }
}

impl Drop for SubscriptionTask {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

/// Spawn [`SubscribeExt::subscribe`] onto the current tokio runtime.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_subscription<S, T, F, Fut, OnError, OnComplete>(
    stream: S,
    on_next: F,
    on_error: OnError,
    on_complete: OnComplete,
) -> SubscriptionTask
where
    S: CancellableStream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Send + 'static,
    F: FnMut(T, CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
    OnError: FnOnce(SensorError) + Send + 'static,
    OnComplete: FnOnce() + Send + 'static,
{
    let cancellation_token = CancellationToken::new();
    let token = cancellation_token.clone();
    let handle = tokio::spawn(async move {
        stream
            .subscribe(on_next, on_error, on_complete, Some(token))
            .await
    });

    SubscriptionTask {
        cancellation_token,
        handle: Some(handle),
    }
}
