// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Event records emitted by sensor streams.
//!
//! Both records are plain data: values are carried exactly as the subsystem reported them,
//! with no range checks, unit conversion or filtering.

use crate::SensorKind;

/// Accuracy status attached to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorAccuracy {
    /// The sensor is not in contact with what it measures.
    NoContact,
    Unreliable,
    Low,
    Medium,
    High,
}

impl SensorAccuracy {
    /// Maps a subsystem accuracy code (-1..=3). Unknown codes map to `Unreliable`.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::NoContact,
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::Unreliable,
        }
    }
}

/// One event of a continuous sensor stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSample {
    kind: SensorKind,
    values: Vec<f32>,
    accuracy: SensorAccuracy,
    timestamp_ns: i64,
}

impl SensorSample {
    #[must_use]
    pub fn new(
        kind: SensorKind,
        values: Vec<f32>,
        accuracy: SensorAccuracy,
        timestamp_ns: i64,
    ) -> Self {
        Self {
            kind,
            values,
            accuracy,
            timestamp_ns,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Readings in the order the subsystem produced them. The length is fixed per sensor kind.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[must_use]
    pub fn accuracy(&self) -> SensorAccuracy {
        self.accuracy
    }

    /// Subsystem timestamp in nanoseconds.
    #[must_use]
    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }
}

/// The single occurrence reported by a one-shot trigger sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerSignal {
    kind: SensorKind,
    timestamp_ns: i64,
    values: Vec<f32>,
}

impl TriggerSignal {
    #[must_use]
    pub fn new(kind: SensorKind, timestamp_ns: i64, values: Vec<f32>) -> Self {
        Self {
            kind,
            timestamp_ns,
            values,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    #[must_use]
    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    /// Raw payload, usually empty or a single `1.0` for motion triggers.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
