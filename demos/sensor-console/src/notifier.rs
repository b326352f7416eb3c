// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Simulated notification thread - plays the hardware side of the device

use rxsensor::SensorKind;
use rxsensor_test_utils::MockSensorSubsystem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

pub struct Notifier {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Notifier {
    pub fn start(device: Arc<MockSensorSubsystem>, seed: u64) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let thread = thread::Builder::new()
            .name("sensor-notifier".to_string())
            .spawn({
                let running = running.clone();
                move || Self::run(&device, &running, seed)
            })
            .inspect_err(|error| tracing::warn!(%error, "failed to start the notifier thread"))
            .ok();

        Self { running, thread }
    }

    pub fn stop(mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("notifier thread panicked");
            }
        }
    }

    fn run(device: &MockSensorSubsystem, running: &AtomicBool, seed: u64) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let started = Instant::now();

        while running.load(Ordering::Acquire) {
            let timestamp_ns = i64::try_from(started.elapsed().as_nanos()).unwrap_or(i64::MAX);

            let shake = rng.f32() - 0.5;
            device.emit_sample(
                SensorKind::Accelerometer,
                vec![shake, rng.f32() * 0.2, 9.81 + shake],
                timestamp_ns,
            );

            // Roughly one significant motion every two seconds.
            if rng.u32(..100) == 0 {
                device.fire_trigger(SensorKind::SignificantMotion, timestamp_ns);
            }

            thread::sleep(SAMPLE_INTERVAL);
        }
    }
}
