// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-memory [`SensorSubsystem`] with scripted behaviour and a recorded call log.

use parking_lot::Mutex;
use rxsensor::{
    ListenerId, RawSensorEvent, RawTriggerEvent, SensorEventListener, SensorSubsystem,
    SubsystemCapabilities, SubsystemError, TriggerEventListener,
};
use rxsensor_core::{SamplingPeriod, SensorHandle, SensorKind};
use std::sync::Arc;
use std::time::Duration;

/// One interaction with the mock, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum SubsystemCall {
    RegisterListener {
        listener: ListenerId,
        sensor: SensorHandle,
        sampling_period: SamplingPeriod,
        max_report_latency: Option<Duration>,
        accepted: bool,
    },
    UnregisterListener {
        listener: ListenerId,
        sensor: SensorHandle,
    },
    RequestTrigger {
        listener: ListenerId,
        sensor: SensorHandle,
        accepted: bool,
    },
    CancelTrigger {
        listener: ListenerId,
        sensor: SensorHandle,
    },
    /// A continuous event was handed to a listener.
    SampleDelivered {
        listener: ListenerId,
        timestamp_ns: i64,
    },
    /// A trigger event was handed to a listener.
    TriggerDelivered {
        listener: ListenerId,
        timestamp_ns: i64,
    },
}

impl SubsystemCall {
    #[must_use]
    pub fn listener(&self) -> ListenerId {
        match self {
            Self::RegisterListener { listener, .. }
            | Self::UnregisterListener { listener, .. }
            | Self::RequestTrigger { listener, .. }
            | Self::CancelTrigger { listener, .. }
            | Self::SampleDelivered { listener, .. }
            | Self::TriggerDelivered { listener, .. } => *listener,
        }
    }

    #[must_use]
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            Self::RegisterListener { .. } | Self::RequestTrigger { .. }
        )
    }

    #[must_use]
    pub fn is_deregistration(&self) -> bool {
        matches!(
            self,
            Self::UnregisterListener { .. } | Self::CancelTrigger { .. }
        )
    }
}

/// How deregistration calls misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnregisterFailure {
    #[default]
    None,
    /// Return `SubsystemError::Failure`.
    Error,
    /// Panic inside the call.
    Panic,
}

struct Registration<L: ?Sized> {
    id: ListenerId,
    sensor: SensorHandle,
    listener: Arc<L>,
}

struct MockState {
    sensors: Vec<SensorHandle>,
    refused: Vec<SensorKind>,
    listeners: Vec<Registration<dyn SensorEventListener>>,
    triggers: Vec<Registration<dyn TriggerEventListener>>,
    calls: Vec<SubsystemCall>,
    unregister_failure: UnregisterFailure,
    sticky_triggers: bool,
    capabilities: SubsystemCapabilities,
}

/// Scriptable sensor subsystem for tests.
///
/// Registration and deregistration calls are recorded under the lock; listeners are always
/// invoked after the lock is released, so they may call back into the mock.
pub struct MockSensorSubsystem {
    state: Mutex<MockState>,
}

impl MockSensorSubsystem {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                sensors: Vec::new(),
                refused: Vec::new(),
                listeners: Vec::new(),
                triggers: Vec::new(),
                calls: Vec::new(),
                unregister_failure: UnregisterFailure::None,
                sticky_triggers: false,
                capabilities: SubsystemCapabilities::default(),
            }),
        }
    }

    #[must_use]
    pub fn with_sensor(self, sensor: SensorHandle) -> Self {
        self.add_sensor(sensor);
        self
    }

    #[must_use]
    pub fn with_capabilities(self, capabilities: SubsystemCapabilities) -> Self {
        self.state.lock().capabilities = capabilities;
        self
    }

    pub fn add_sensor(&self, sensor: SensorHandle) {
        self.state.lock().sensors.push(sensor);
    }

    /// Make registration of listeners and triggers for `kind` fail.
    pub fn refuse_registration(&self, kind: SensorKind) {
        self.state.lock().refused.push(kind);
    }

    pub fn accept_registration(&self, kind: SensorKind) {
        self.state.lock().refused.retain(|refused| *refused != kind);
    }

    pub fn set_unregister_failure(&self, failure: UnregisterFailure) {
        self.state.lock().unregister_failure = failure;
    }

    /// Keep triggers armed after they fire or are cancelled, as a misbehaving subsystem would.
    pub fn set_sticky_triggers(&self, sticky: bool) {
        self.state.lock().sticky_triggers = sticky;
    }

    /// Deliver one continuous event to every listener registered for `kind`.
    ///
    /// Returns the number of listeners that received it.
    pub fn emit_sample(&self, kind: SensorKind, values: Vec<f32>, timestamp_ns: i64) -> usize {
        let targets: Vec<_> = {
            let mut state = self.state.lock();
            let targets: Vec<_> = state
                .listeners
                .iter()
                .filter(|registration| registration.sensor.kind() == kind)
                .map(|registration| {
                    (
                        registration.id,
                        registration.sensor.clone(),
                        registration.listener.clone(),
                    )
                })
                .collect();
            for (id, _, _) in &targets {
                state.calls.push(SubsystemCall::SampleDelivered {
                    listener: *id,
                    timestamp_ns,
                });
            }
            targets
        };

        let delivered = targets.len();
        for (_, sensor, listener) in targets {
            listener.on_sensor_changed(RawSensorEvent {
                handle: sensor,
                values: values.clone(),
                accuracy: 3,
                timestamp_ns,
            });
        }
        delivered
    }

    /// Fire every trigger armed for `kind`.
    ///
    /// Triggers are disarmed before their listener runs, unless sticky triggers are enabled.
    /// Returns the number of listeners that received the event.
    pub fn fire_trigger(&self, kind: SensorKind, timestamp_ns: i64) -> usize {
        let targets: Vec<_> = {
            let mut state = self.state.lock();
            let targets: Vec<_> = state
                .triggers
                .iter()
                .filter(|registration| registration.sensor.kind() == kind)
                .map(|registration| {
                    (
                        registration.id,
                        registration.sensor.clone(),
                        registration.listener.clone(),
                    )
                })
                .collect();
            if !state.sticky_triggers {
                state
                    .triggers
                    .retain(|registration| registration.sensor.kind() != kind);
            }
            for (id, _, _) in &targets {
                state.calls.push(SubsystemCall::TriggerDelivered {
                    listener: *id,
                    timestamp_ns,
                });
            }
            targets
        };

        let delivered = targets.len();
        for (_, sensor, listener) in targets {
            listener.on_trigger(RawTriggerEvent {
                handle: sensor,
                values: vec![1.0],
                timestamp_ns,
            });
        }
        delivered
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<SubsystemCall> {
        self.state.lock().calls.clone()
    }

    /// Recorded calls concerning one listener.
    #[must_use]
    pub fn calls_for(&self, listener: ListenerId) -> Vec<SubsystemCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.listener() == listener)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.count(SubsystemCall::is_registration)
    }

    #[must_use]
    pub fn deregistration_count(&self) -> usize {
        self.count(SubsystemCall::is_deregistration)
    }

    #[must_use]
    pub fn active_listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    #[must_use]
    pub fn active_trigger_count(&self) -> usize {
        self.state.lock().triggers.len()
    }

    fn count(&self, predicate: impl Fn(&SubsystemCall) -> bool) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    fn fail_deregistration(failure: UnregisterFailure) -> Result<(), SubsystemError> {
        match failure {
            UnregisterFailure::None => Ok(()),
            UnregisterFailure::Error => Err(SubsystemError::Failure(
                "injected deregistration failure".to_string(),
            )),
            UnregisterFailure::Panic => panic!("injected deregistration panic"),
        }
    }
}

impl Default for MockSensorSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSubsystem for MockSensorSubsystem {
    fn sensor_list(&self) -> Vec<SensorHandle> {
        self.state.lock().sensors.clone()
    }

    fn default_sensor(&self, kind: SensorKind) -> Option<SensorHandle> {
        self.state
            .lock()
            .sensors
            .iter()
            .find(|sensor| sensor.kind() == kind)
            .cloned()
    }

    fn register_listener(
        &self,
        listener: Arc<dyn SensorEventListener>,
        handle: &SensorHandle,
        sampling_period: SamplingPeriod,
        max_report_latency: Option<Duration>,
    ) -> bool {
        let mut state = self.state.lock();
        let id = listener.id();
        let accepted = !state.refused.contains(&handle.kind());
        state.calls.push(SubsystemCall::RegisterListener {
            listener: id,
            sensor: handle.clone(),
            sampling_period,
            max_report_latency,
            accepted,
        });
        if accepted {
            state.listeners.push(Registration {
                id,
                sensor: handle.clone(),
                listener,
            });
        }
        accepted
    }

    fn unregister_listener(
        &self,
        listener: ListenerId,
        handle: &SensorHandle,
    ) -> Result<(), SubsystemError> {
        let failure = {
            let mut state = self.state.lock();
            state.calls.push(SubsystemCall::UnregisterListener {
                listener,
                sensor: handle.clone(),
            });
            state
                .listeners
                .retain(|registration| !(registration.id == listener && &registration.sensor == handle));
            state.unregister_failure
        };
        Self::fail_deregistration(failure)
    }

    fn request_trigger_sensor(
        &self,
        listener: Arc<dyn TriggerEventListener>,
        handle: &SensorHandle,
    ) -> bool {
        let mut state = self.state.lock();
        let id = listener.id();
        let accepted = !state.refused.contains(&handle.kind());
        state.calls.push(SubsystemCall::RequestTrigger {
            listener: id,
            sensor: handle.clone(),
            accepted,
        });
        if accepted {
            state.triggers.push(Registration {
                id,
                sensor: handle.clone(),
                listener,
            });
        }
        accepted
    }

    fn cancel_trigger_sensor(
        &self,
        listener: ListenerId,
        handle: &SensorHandle,
    ) -> Result<(), SubsystemError> {
        let failure = {
            let mut state = self.state.lock();
            state.calls.push(SubsystemCall::CancelTrigger {
                listener,
                sensor: handle.clone(),
            });
            if !state.sticky_triggers {
                state
                    .triggers
                    .retain(|registration| !(registration.id == listener && &registration.sensor == handle));
            }
            state.unregister_failure
        };
        Self::fail_deregistration(failure)
    }

    fn capabilities(&self) -> SubsystemCapabilities {
        self.state.lock().capabilities
    }
}

impl std::fmt::Debug for MockSensorSubsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockSensorSubsystem")
            .field("sensors", &state.sensors)
            .field("listeners", &state.listeners.len())
            .field("triggers", &state.triggers.len())
            .field("calls", &state.calls.len())
            .finish()
    }
}
