// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::hash::{Hash, Hasher};

/// How a sensor delivers its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportingMode {
    /// Events arrive at the requested sampling period.
    Continuous,
    /// Events arrive only when the measured value changes.
    OnChange,
    /// A single event, after which the sensor disarms itself.
    OneShot,
    /// Sensor-specific delivery rules.
    Special,
}

/// Logical identifier for a class of physical sensor.
///
/// The numeric codes match the type constants used by common sensor subsystems, so a
/// subsystem binding can convert with [`SensorKind::code`] and [`SensorKind::from_code`].
/// Unknown codes round-trip through [`SensorKind::Other`].
///
/// Kinds compare, hash and report by their code, so `Other(1)` is the accelerometer.
#[derive(Debug, Clone, Copy)]
pub enum SensorKind {
    Accelerometer,
    MagneticField,
    Gyroscope,
    Light,
    Pressure,
    Proximity,
    Gravity,
    LinearAcceleration,
    RotationVector,
    RelativeHumidity,
    AmbientTemperature,
    SignificantMotion,
    StepDetector,
    StepCounter,
    Other(i32),
}

impl SensorKind {
    /// Returns the subsystem type code for this kind.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Accelerometer => 1,
            Self::MagneticField => 2,
            Self::Gyroscope => 4,
            Self::Light => 5,
            Self::Pressure => 6,
            Self::Proximity => 8,
            Self::Gravity => 9,
            Self::LinearAcceleration => 10,
            Self::RotationVector => 11,
            Self::RelativeHumidity => 12,
            Self::AmbientTemperature => 13,
            Self::SignificantMotion => 17,
            Self::StepDetector => 18,
            Self::StepCounter => 19,
            Self::Other(code) => code,
        }
    }

    /// Maps a subsystem type code back to a kind.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Accelerometer,
            2 => Self::MagneticField,
            4 => Self::Gyroscope,
            5 => Self::Light,
            6 => Self::Pressure,
            8 => Self::Proximity,
            9 => Self::Gravity,
            10 => Self::LinearAcceleration,
            11 => Self::RotationVector,
            12 => Self::RelativeHumidity,
            13 => Self::AmbientTemperature,
            17 => Self::SignificantMotion,
            18 => Self::StepDetector,
            19 => Self::StepCounter,
            other => Self::Other(other),
        }
    }

    /// Reporting mode the subsystem uses for this kind.
    ///
    /// Unknown kinds are assumed to be continuous.
    #[must_use]
    pub const fn reporting_mode(self) -> ReportingMode {
        match self.normalized() {
            Self::Light
            | Self::Pressure
            | Self::Proximity
            | Self::RelativeHumidity
            | Self::AmbientTemperature
            | Self::StepCounter => ReportingMode::OnChange,
            Self::SignificantMotion => ReportingMode::OneShot,
            Self::StepDetector => ReportingMode::Special,
            _ => ReportingMode::Continuous,
        }
    }

    /// The named variant for this kind's code, if there is one.
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self::from_code(self.code())
    }

    /// Returns `true` if this kind fires once and then disarms.
    #[must_use]
    pub const fn is_one_shot(self) -> bool {
        matches!(self.reporting_mode(), ReportingMode::OneShot)
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.normalized() {
            Self::Accelerometer => "accelerometer",
            Self::MagneticField => "magnetic field",
            Self::Gyroscope => "gyroscope",
            Self::Light => "light",
            Self::Pressure => "pressure",
            Self::Proximity => "proximity",
            Self::Gravity => "gravity",
            Self::LinearAcceleration => "linear acceleration",
            Self::RotationVector => "rotation vector",
            Self::RelativeHumidity => "relative humidity",
            Self::AmbientTemperature => "ambient temperature",
            Self::SignificantMotion => "significant motion",
            Self::StepDetector => "step detector",
            Self::StepCounter => "step counter",
            Self::Other(code) => return write!(f, "sensor type {code}"),
        };
        f.write_str(name)
    }
}

impl PartialEq for SensorKind {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for SensorKind {}

impl Hash for SensorKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_known_and_unknown_kinds() {
        for code in [1, 2, 4, 17, 19, 42, -3] {
            assert_eq!(SensorKind::from_code(code).code(), code);
        }
        assert_eq!(SensorKind::from_code(42), SensorKind::Other(42));
    }

    #[test]
    fn significant_motion_is_one_shot() {
        assert!(SensorKind::SignificantMotion.is_one_shot());
        assert!(!SensorKind::Accelerometer.is_one_shot());
        assert_eq!(
            SensorKind::Accelerometer.reporting_mode(),
            ReportingMode::Continuous
        );
    }

    #[test]
    fn other_with_a_known_code_is_that_kind() {
        use std::collections::HashSet;

        assert_eq!(SensorKind::Other(1), SensorKind::Accelerometer);
        assert_eq!(SensorKind::Other(17).normalized(), SensorKind::SignificantMotion);
        assert!(SensorKind::Other(17).is_one_shot());
        assert_eq!(SensorKind::Other(4).to_string(), "gyroscope");
        assert_ne!(SensorKind::Other(3), SensorKind::Accelerometer);

        let kinds: HashSet<_> = [SensorKind::Other(5), SensorKind::Light].into_iter().collect();
        assert_eq!(kinds.len(), 1);
    }

    #[test]
    fn display_uses_readable_names() {
        assert_eq!(SensorKind::Gyroscope.to_string(), "gyroscope");
        assert_eq!(SensorKind::Other(99).to_string(), "sensor type 99");
    }
}
