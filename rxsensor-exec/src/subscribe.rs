// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use core::future::Future;
use futures::future::{select, Either};
use futures::pin_mut;
use futures::stream::StreamExt;
use rxsensor_core::{CancellableStream, CancellationToken, SensorError, StreamItem};

/// How a subscription ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    /// The stream ended on its own, e.g. a trigger stream after its single element.
    Completed,
    /// The stream reported a terminal error.
    Failed(SensorError),
    /// The cancellation token fired first.
    Cancelled,
}

impl SubscriptionOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    #[must_use]
    pub fn error(&self) -> Option<&SensorError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Extension trait for consuming a cancellable sensor stream with callbacks.
#[async_trait]
pub trait SubscribeExt<T>: CancellableStream<Item = StreamItem<T>> + Sized {
    /// Consumes the stream until it completes, fails or `cancellation_token` is cancelled.
    ///
    /// # Behavior
    ///
    /// - Elements are handed to `on_next` one at a time; the next element is not pulled until
    ///   the handler's future finishes, so latest-value-wins applies while the handler runs
    /// - An error element ends the subscription: the stream is cancelled, then `on_error` runs
    /// - Natural end of the stream runs `on_complete`
    /// - Cancelling the token cancels the stream (deregistering its listener) and runs neither
    ///   `on_error` nor `on_complete`
    ///
    /// Exactly one of the terminal callbacks runs at most once.
    ///
    /// # Examples
    ///
    /// ```
    /// use rxsensor::{SensorKind, SensorStreamAdapter, StreamItem};
    /// use rxsensor_exec::{SubscribeExt, SubscriptionOutcome};
    /// use rxsensor_test_utils::fixtures;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let adapter = SensorStreamAdapter::new(fixtures::phone());
    ///
    /// let outcome = adapter
    ///     .single_trigger_stream(SensorKind::Gyroscope)
    ///     .subscribe(
    ///         |_signal, _token| async {},
    ///         |error| eprintln!("{error}"),
    ///         || println!("done"),
    ///         None,
    ///     )
    ///     .await;
    ///
    /// assert!(matches!(outcome, SubscriptionOutcome::Failed(_)));
    /// # }
    /// ```
    async fn subscribe<F, Fut, OnError, OnComplete>(
        self,
        on_next: F,
        on_error: OnError,
        on_complete: OnComplete,
        cancellation_token: Option<CancellationToken>,
    ) -> SubscriptionOutcome
    where
        F: FnMut(T, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
        OnError: FnOnce(SensorError) + Send + 'static,
        OnComplete: FnOnce() + Send + 'static,
        T: Send + 'static;
}

#[async_trait]
impl<S, T> SubscribeExt<T> for S
where
    S: CancellableStream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Send + 'static,
{
    async fn subscribe<F, Fut, OnError, OnComplete>(
        mut self,
        mut on_next: F,
        on_error: OnError,
        on_complete: OnComplete,
        cancellation_token: Option<CancellationToken>,
    ) -> SubscriptionOutcome
    where
        F: FnMut(T, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
        OnError: FnOnce(SensorError) + Send + 'static,
        OnComplete: FnOnce() + Send + 'static,
        T: Send + 'static,
    {
        let cancellation_token = cancellation_token.unwrap_or_default();

        loop {
            let next = {
                let cancelled = cancellation_token.cancelled();
                pin_mut!(cancelled);
                // Cancellation is polled first so it wins over a ready element.
                match select(cancelled, self.next()).await {
                    Either::Left(((), _)) => None,
                    Either::Right((item, _)) => Some(item),
                }
            };

            match next {
                None => {
                    debug!("subscription cancelled");
                    self.cancel();
                    return SubscriptionOutcome::Cancelled;
                }
                Some(None) => {
                    on_complete();
                    return SubscriptionOutcome::Completed;
                }
                Some(Some(StreamItem::Value(value))) => {
                    on_next(value, cancellation_token.clone()).await;
                }
                Some(Some(StreamItem::Error(error))) => {
                    warn!("subscription failed: {}", error);
                    self.cancel();
                    on_error(error.clone());
                    return SubscriptionOutcome::Failed(error);
                }
            }
        }
    }
}
