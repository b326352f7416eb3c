// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::mock_subsystem::MockSensorSubsystem;
use rxsensor_core::{SensorHandle, SensorKind};
use std::sync::Arc;

pub fn accelerometer() -> SensorHandle {
    SensorHandle::new(1, SensorKind::Accelerometer, "BMI260 Accelerometer", "Bosch")
}

pub fn gyroscope() -> SensorHandle {
    SensorHandle::new(2, SensorKind::Gyroscope, "BMI260 Gyroscope", "Bosch")
}

pub fn light() -> SensorHandle {
    SensorHandle::new(3, SensorKind::Light, "TMD3702V Ambient Light", "AMS")
}

pub fn significant_motion() -> SensorHandle {
    SensorHandle::new(4, SensorKind::SignificantMotion, "Significant Motion Detector", "Google")
}

/// A device with an accelerometer, a light sensor and a significant-motion trigger, but no
/// gyroscope.
pub fn phone() -> Arc<MockSensorSubsystem> {
    Arc::new(
        MockSensorSubsystem::new()
            .with_sensor(accelerometer())
            .with_sensor(light())
            .with_sensor(significant_motion()),
    )
}

/// Readings whose first value identifies the sample, for asserting which samples got through.
pub fn marked(marker: f32) -> Vec<f32> {
    vec![marker, 0.0, 9.81]
}
