// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types surfaced by sensor streams.
//!
//! A sensor stream can fail in exactly two ways, both before it produces its first element:
//! the device has no sensor of the requested kind, or the subsystem refused the listener.
//! The two are kept apart because they call for different reactions: absence is permanent
//! for the lifetime of the process, a refused registration may succeed later.
//!
//! # Examples
//!
//! ```
//! use rxsensor_core::{SensorError, SensorKind};
//!
//! let err = SensorError::unavailable(SensorKind::Gyroscope);
//! assert!(err.is_permanent());
//! assert_eq!(err.kind(), SensorKind::Gyroscope);
//! ```

use crate::{SensorHandle, SensorKind};

/// Terminal failure of a sensor stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    /// The device exposes no sensor of the requested kind.
    #[error("Sensor unavailable: no {kind} sensor on this device")]
    SensorUnavailable {
        /// The kind that was requested
        kind: SensorKind,
    },

    /// The subsystem declined to register a listener for an existing sensor.
    ///
    /// Typical causes are resource exhaustion or a missing permission.
    #[error("Registration failed: listener refused for sensor {handle}")]
    RegistrationFailed {
        /// The sensor the registration targeted
        handle: SensorHandle,
    },
}

impl SensorError {
    pub fn unavailable(kind: SensorKind) -> Self {
        Self::SensorUnavailable { kind }
    }

    pub fn registration_failed(handle: SensorHandle) -> Self {
        Self::RegistrationFailed { handle }
    }

    /// The sensor kind the failed stream was requested for.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        match self {
            Self::SensorUnavailable { kind } => *kind,
            Self::RegistrationFailed { handle } => handle.kind(),
        }
    }

    /// Resubscribing may succeed later.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::RegistrationFailed { .. })
    }

    /// Resubscribing can never succeed in this process.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::SensorUnavailable { .. })
    }
}

/// Specialized Result type for sensor operations.
pub type Result<T> = std::result::Result<T, SensorError>;
