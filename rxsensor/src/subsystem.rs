// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The hardware sensor subsystem as seen by the adapter.
//!
//! A subsystem keeps a registration table of listeners and pushes events to them from a
//! notification thread it owns. Bindings for a real platform implement [`SensorSubsystem`];
//! tests use the mock from `rxsensor-test-utils`.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use rxsensor_core::{SamplingPeriod, SensorAccuracy, SensorHandle, SensorKind, SensorSample, TriggerSignal};
use std::sync::Arc;

/// Identity of one listener registration.
///
/// Every subscription allocates a fresh id, so two streams over the same sensor never share a
/// listener from the subsystem's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A continuous sensor event exactly as the subsystem reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSensorEvent {
    pub handle: SensorHandle,
    pub values: Vec<f32>,
    /// Subsystem accuracy code, see [`SensorAccuracy::from_code`].
    pub accuracy: i32,
    pub timestamp_ns: i64,
}

impl From<RawSensorEvent> for SensorSample {
    fn from(event: RawSensorEvent) -> Self {
        SensorSample::new(
            event.handle.kind(),
            event.values,
            SensorAccuracy::from_code(event.accuracy),
            event.timestamp_ns,
        )
    }
}

/// A one-shot trigger occurrence exactly as the subsystem reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTriggerEvent {
    pub handle: SensorHandle,
    pub values: Vec<f32>,
    pub timestamp_ns: i64,
}

impl From<RawTriggerEvent> for TriggerSignal {
    fn from(event: RawTriggerEvent) -> Self {
        TriggerSignal::new(event.handle.kind(), event.timestamp_ns, event.values)
    }
}

/// Receives continuous events. Called on the subsystem's notification thread.
pub trait SensorEventListener: Send + Sync {
    fn id(&self) -> ListenerId;

    fn on_sensor_changed(&self, event: RawSensorEvent);

    fn on_accuracy_changed(&self, _handle: &SensorHandle, _accuracy: SensorAccuracy) {}
}

/// Receives the single event of a one-shot trigger. Called on the subsystem's notification thread.
pub trait TriggerEventListener: Send + Sync {
    fn id(&self) -> ListenerId;

    fn on_trigger(&self, event: RawTriggerEvent);
}

/// Failure reported by a subsystem's deregistration calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubsystemError {
    #[error("{listener} is not registered for {handle}")]
    NotRegistered {
        listener: ListenerId,
        handle: SensorHandle,
    },

    #[error("Sensor subsystem failure: {0}")]
    Failure(String),
}

/// Optional features of a subsystem, read once when an adapter is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsystemCapabilities {
    /// Whether `register_listener` honours a maximum report latency (hardware batching).
    /// Older subsystems only accept a sampling period.
    pub supports_report_latency: bool,
}

impl Default for SubsystemCapabilities {
    fn default() -> Self {
        Self {
            supports_report_latency: true,
        }
    }
}

/// The callback-driven sensor API the adapter is built on.
///
/// Implementations own the registration table; the adapter only ever mutates it through these
/// calls and never mirrors its contents.
pub trait SensorSubsystem: Send + Sync {
    /// Every sensor available on the device.
    fn sensor_list(&self) -> Vec<SensorHandle>;

    /// The default sensor of `kind`, if the device has one.
    fn default_sensor(&self, kind: SensorKind) -> Option<SensorHandle>;

    /// Registers `listener` for continuous events. Returns `false` if the subsystem refuses.
    ///
    /// `max_report_latency` is `None` on subsystems without batching support.
    fn register_listener(
        &self,
        listener: Arc<dyn SensorEventListener>,
        handle: &SensorHandle,
        sampling_period: SamplingPeriod,
        max_report_latency: Option<Duration>,
    ) -> bool;

    fn unregister_listener(
        &self,
        listener: ListenerId,
        handle: &SensorHandle,
    ) -> Result<(), SubsystemError>;

    /// Arms a one-shot trigger. The subsystem disarms it by itself after it fires.
    fn request_trigger_sensor(
        &self,
        listener: Arc<dyn TriggerEventListener>,
        handle: &SensorHandle,
    ) -> bool;

    fn cancel_trigger_sensor(
        &self,
        listener: ListenerId,
        handle: &SensorHandle,
    ) -> Result<(), SubsystemError>;

    fn capabilities(&self) -> SubsystemCapabilities {
        SubsystemCapabilities::default()
    }
}
