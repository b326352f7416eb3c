// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::subscription::{Driver, Protocol, Subscription, SubscriptionHandle, SubscriptionState};
use crate::subsystem::{
    ListenerId, RawSensorEvent, SensorEventListener, SensorSubsystem, SubsystemError,
};
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;
use futures::stream::{FusedStream, Stream};
use rxsensor_core::{CancellableStream, SamplingPeriod, SensorHandle, SensorSample, StreamItem};
use std::sync::Arc;

pub(crate) struct Continuous {
    pub(crate) sampling_period: SamplingPeriod,
    pub(crate) max_report_latency: Option<Duration>,
}

impl Protocol for Continuous {
    type Item = SensorSample;

    fn register(subscription: &Arc<Subscription<Self>>, handle: &SensorHandle) -> bool {
        let listener = Arc::new(SampleListener {
            subscription: subscription.clone(),
        });
        let protocol = subscription.protocol();
        subscription.subsystem().register_listener(
            listener,
            handle,
            protocol.sampling_period,
            protocol.max_report_latency,
        )
    }

    fn deregister(
        &self,
        subsystem: &dyn SensorSubsystem,
        listener: ListenerId,
        handle: &SensorHandle,
    ) -> Result<(), SubsystemError> {
        subsystem.unregister_listener(listener, handle)
    }
}

struct SampleListener {
    subscription: Arc<Subscription<Continuous>>,
}

impl SensorEventListener for SampleListener {
    fn id(&self) -> ListenerId {
        self.subscription.id()
    }

    fn on_sensor_changed(&self, event: RawSensorEvent) {
        self.subscription.slot().offer(SensorSample::from(event));
    }
}

/// Unbounded stream of samples from one continuous sensor registration.
///
/// Nothing is registered until the stream is first polled. From then on every callback becomes
/// one [`SensorSample`], handed over with latest-value-wins semantics: if the consumer has not
/// taken the previous sample when the next one arrives, the previous one is dropped.
///
/// The stream only ends when it is cancelled (or dropped), or with a single
/// [`StreamItem::Error`] if the sensor is missing or the registration is refused.
pub struct SensorStream {
    driver: Driver<Continuous>,
}

impl SensorStream {
    pub(crate) fn new(subscription: Arc<Subscription<Continuous>>) -> Self {
        Self {
            driver: Driver::new(subscription),
        }
    }

    /// Deregister the listener and end the stream. Idempotent.
    pub fn cancel(&self) {
        self.driver.cancel();
    }

    /// A handle that can cancel this stream from elsewhere.
    #[must_use]
    pub fn handle(&self) -> SubscriptionHandle {
        self.driver.handle()
    }

    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        self.driver.state()
    }
}

impl Stream for SensorStream {
    type Item = StreamItem<SensorSample>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().driver.poll_next(cx)
    }
}

impl FusedStream for SensorStream {
    fn is_terminated(&self) -> bool {
        self.driver.is_finished()
    }
}

impl CancellableStream for SensorStream {
    fn cancel(&self) {
        self.driver.cancel();
    }

    fn is_terminated(&self) -> bool {
        self.driver.is_finished()
    }
}

impl core::fmt::Debug for SensorStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SensorStream").field(&self.handle()).finish()
    }
}
