// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::subscription::{Driver, Protocol, Subscription, SubscriptionHandle, SubscriptionState};
use crate::subsystem::{
    ListenerId, RawTriggerEvent, SensorSubsystem, SubsystemError, TriggerEventListener,
};
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};
use futures::stream::{FusedStream, Stream};
use rxsensor_core::{CancellableStream, SensorHandle, StreamItem, TriggerSignal};
use std::sync::Arc;

pub(crate) struct OneShot;

impl Protocol for OneShot {
    type Item = TriggerSignal;

    fn register(subscription: &Arc<Subscription<Self>>, handle: &SensorHandle) -> bool {
        let listener = Arc::new(TriggerListener {
            subscription: subscription.clone(),
            fired: AtomicBool::new(false),
        });
        subscription
            .subsystem()
            .request_trigger_sensor(listener, handle)
    }

    fn deregister(
        &self,
        subsystem: &dyn SensorSubsystem,
        listener: ListenerId,
        handle: &SensorHandle,
    ) -> Result<(), SubsystemError> {
        // The subsystem disarms a fired trigger itself; cancelling it again is harmless and
        // required when the consumer leaves before it fires.
        subsystem.cancel_trigger_sensor(listener, handle)
    }
}

struct TriggerListener {
    subscription: Arc<Subscription<OneShot>>,
    fired: AtomicBool,
}

impl TriggerEventListener for TriggerListener {
    fn id(&self) -> ListenerId {
        self.subscription.id()
    }

    fn on_trigger(&self, event: RawTriggerEvent) {
        if self.fired.swap(true, Ordering::AcqRel) {
            trace!(listener = %self.subscription.id(), "ignoring repeated trigger");
            return;
        }
        self.subscription.slot().offer(TriggerSignal::from(event));
        self.subscription.complete();
    }
}

/// Stream that yields exactly one [`TriggerSignal`] and then completes.
///
/// The trigger is armed on first poll. If the stream is cancelled or dropped before the trigger
/// fires, the armed trigger is cancelled with the subsystem.
pub struct TriggerStream {
    driver: Driver<OneShot>,
}

impl TriggerStream {
    pub(crate) fn new(subscription: Arc<Subscription<OneShot>>) -> Self {
        Self {
            driver: Driver::new(subscription),
        }
    }

    /// Disarm the trigger and end the stream. Idempotent.
    pub fn cancel(&self) {
        self.driver.cancel();
    }

    #[must_use]
    pub fn handle(&self) -> SubscriptionHandle {
        self.driver.handle()
    }

    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        self.driver.state()
    }
}

impl Stream for TriggerStream {
    type Item = StreamItem<TriggerSignal>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().driver.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.driver.is_finished() {
            (0, Some(0))
        } else {
            (0, Some(1))
        }
    }
}

impl FusedStream for TriggerStream {
    fn is_terminated(&self) -> bool {
        self.driver.is_finished()
    }
}

impl CancellableStream for TriggerStream {
    fn cancel(&self) {
        self.driver.cancel();
    }

    fn is_terminated(&self) -> bool {
        self.driver.is_finished()
    }
}

impl core::fmt::Debug for TriggerStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("TriggerStream").field(&self.handle()).finish()
    }
}
