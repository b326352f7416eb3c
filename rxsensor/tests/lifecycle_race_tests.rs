// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use core::time::Duration;
use parking_lot::Mutex;
use rxsensor::{
    ListenerId, RawTriggerEvent, SamplingPeriod, SensorEventListener, SensorHandle, SensorKind,
    SensorStreamAdapter, SensorSubsystem, StreamItem, SubscriptionHandle, SubscriptionState,
    SubsystemError, TriggerEventListener,
};
use rxsensor_test_utils::{fixtures, poll_once};
use std::sync::{Arc, Barrier};
use std::thread;

/// Subsystem whose calls misbehave in scripted ways: re-entrant cancels, triggers that fire while
/// being armed, and slow deregistration.
#[derive(Default)]
struct ScriptedSubsystem {
    cancel_on_register: Mutex<Option<SubscriptionHandle>>,
    fire_while_arming: Option<i64>,
    unregister_delay: Option<Duration>,
    unregister_entered: Mutex<Option<Arc<Barrier>>>,
    armed: Mutex<Option<Arc<dyn TriggerEventListener>>>,
    unregistering: AtomicBool,
    overlapping_registration: AtomicBool,
    registrations: AtomicUsize,
    unregisters: AtomicUsize,
    trigger_cancels: AtomicUsize,
}

impl SensorSubsystem for ScriptedSubsystem {
    fn sensor_list(&self) -> Vec<SensorHandle> {
        vec![fixtures::accelerometer(), fixtures::significant_motion()]
    }

    fn default_sensor(&self, kind: SensorKind) -> Option<SensorHandle> {
        self.sensor_list()
            .into_iter()
            .find(|handle| handle.kind() == kind)
    }

    fn register_listener(
        &self,
        _listener: Arc<dyn SensorEventListener>,
        _handle: &SensorHandle,
        _sampling_period: SamplingPeriod,
        _max_report_latency: Option<Duration>,
    ) -> bool {
        if self.unregistering.load(Ordering::SeqCst) {
            self.overlapping_registration.store(true, Ordering::SeqCst);
        }
        self.registrations.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.cancel_on_register.lock().take() {
            handle.cancel();
        }
        true
    }

    fn unregister_listener(
        &self,
        _listener: ListenerId,
        _handle: &SensorHandle,
    ) -> Result<(), SubsystemError> {
        self.unregistering.store(true, Ordering::SeqCst);
        let entered = self.unregister_entered.lock().take();
        if let Some(barrier) = entered {
            barrier.wait();
        }
        if let Some(delay) = self.unregister_delay {
            thread::sleep(delay);
        }
        self.unregisters.fetch_add(1, Ordering::SeqCst);
        self.unregistering.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn request_trigger_sensor(
        &self,
        listener: Arc<dyn TriggerEventListener>,
        handle: &SensorHandle,
    ) -> bool {
        match self.fire_while_arming {
            Some(timestamp_ns) => listener.on_trigger(RawTriggerEvent {
                handle: handle.clone(),
                values: vec![1.0],
                timestamp_ns,
            }),
            None => *self.armed.lock() = Some(listener),
        }
        true
    }

    fn cancel_trigger_sensor(
        &self,
        _listener: ListenerId,
        _handle: &SensorHandle,
    ) -> Result<(), SubsystemError> {
        self.trigger_cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl ScriptedSubsystem {
    fn fire_armed(&self, timestamp_ns: i64) {
        let listener = self.armed.lock().take();
        if let Some(listener) = listener {
            listener.on_trigger(RawTriggerEvent {
                handle: fixtures::significant_motion(),
                values: vec![1.0],
                timestamp_ns,
            });
        }
    }
}

#[test]
fn test_cancel_during_registration_deregisters_once_registration_returns() {
    // Arrange
    let subsystem = Arc::new(ScriptedSubsystem::default());
    let adapter = SensorStreamAdapter::new(subsystem.clone());
    let mut stream = adapter.observe(SensorKind::Accelerometer);
    *subsystem.cancel_on_register.lock() = Some(stream.handle());

    // Act
    let first = poll_once(&mut stream);

    // Assert
    assert!(matches!(first, Some(None)));
    assert_eq!(subsystem.registrations.load(Ordering::SeqCst), 1);
    assert_eq!(subsystem.unregisters.load(Ordering::SeqCst), 1);
    assert_eq!(stream.state(), SubscriptionState::Closed);

    drop(stream);
    assert_eq!(subsystem.unregisters.load(Ordering::SeqCst), 1);
}

#[test]
fn test_trigger_fired_while_arming_is_delivered_then_completes() {
    // Arrange
    let subsystem = Arc::new(ScriptedSubsystem {
        fire_while_arming: Some(5),
        ..ScriptedSubsystem::default()
    });
    let adapter = SensorStreamAdapter::new(subsystem.clone());
    let mut stream = adapter.single_trigger_stream(SensorKind::SignificantMotion);

    // Act
    let first = poll_once(&mut stream);
    let second = poll_once(&mut stream);

    // Assert
    let signal = first
        .flatten()
        .and_then(StreamItem::ok)
        .expect("trigger signal delivered on first poll");
    assert_eq!(signal.kind(), SensorKind::SignificantMotion);
    assert_eq!(signal.timestamp_ns(), 5);
    assert!(matches!(second, Some(None)));
    assert_eq!(subsystem.trigger_cancels.load(Ordering::SeqCst), 1);
    assert_eq!(stream.state(), SubscriptionState::Closed);
}

#[test]
fn test_losing_cancel_waits_for_slow_deregistration() {
    // Arrange
    let entered = Arc::new(Barrier::new(2));
    let subsystem = Arc::new(ScriptedSubsystem {
        unregister_delay: Some(Duration::from_millis(200)),
        unregister_entered: Mutex::new(Some(entered.clone())),
        ..ScriptedSubsystem::default()
    });
    let adapter = SensorStreamAdapter::new(subsystem.clone());
    let mut stream = adapter.observe(SensorKind::Accelerometer);
    assert!(poll_once(&mut stream).is_none());
    let first = stream.handle();
    let second = stream.handle();

    // Act
    let winner = thread::spawn(move || first.cancel());
    entered.wait();
    second.cancel();

    // Assert
    assert_eq!(second.state(), SubscriptionState::Closed);
    assert_eq!(subsystem.unregisters.load(Ordering::SeqCst), 1);
    assert!(!subsystem.unregistering.load(Ordering::SeqCst));
    winner.join().unwrap();

    let mut resubscribed = adapter.observe(SensorKind::Accelerometer);
    assert!(poll_once(&mut resubscribed).is_none());
    assert!(!subsystem.overlapping_registration.load(Ordering::SeqCst));
    assert_eq!(subsystem.registrations.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_cancel_and_trigger_tear_down_once() {
    for round in 0..100_i64 {
        // Arrange
        let subsystem = Arc::new(ScriptedSubsystem::default());
        let adapter = SensorStreamAdapter::new(subsystem.clone());
        let mut stream = adapter.single_trigger_stream(SensorKind::SignificantMotion);
        assert!(poll_once(&mut stream).is_none());
        let handle = stream.handle();
        let start = Arc::new(Barrier::new(2));

        // Act
        let notifier = {
            let subsystem = subsystem.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                subsystem.fire_armed(round);
            })
        };
        start.wait();
        handle.cancel();

        // Assert
        assert_eq!(handle.state(), SubscriptionState::Closed);
        notifier.join().unwrap();
        assert_eq!(subsystem.trigger_cancels.load(Ordering::SeqCst), 1);

        let mut ended = false;
        for _ in 0..2 {
            if matches!(poll_once(&mut stream), Some(None)) {
                ended = true;
                break;
            }
        }
        assert!(ended, "stream did not end in round {round}");
    }
}
