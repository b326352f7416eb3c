// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rxsensor_core::SamplingPeriod;

/// How the adapter decides whether to pass a maximum report latency to the subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatencySupport {
    /// Ask the subsystem through [`SensorSubsystem::capabilities`](crate::SensorSubsystem::capabilities).
    #[default]
    Detect,
    /// Skip detection and use the given answer.
    Force(bool),
}

/// Settings fixed when a [`SensorStreamAdapter`](crate::SensorStreamAdapter) is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterConfig {
    pub report_latency: LatencySupport,
    /// Period used by [`observe`](crate::SensorStreamAdapter::observe).
    pub default_sampling_period: SamplingPeriod,
}

impl AdapterConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            report_latency: LatencySupport::Detect,
            default_sampling_period: SamplingPeriod::Normal,
        }
    }

    #[must_use]
    pub const fn with_report_latency(mut self, report_latency: LatencySupport) -> Self {
        self.report_latency = report_latency;
        self
    }

    #[must_use]
    pub const fn with_default_sampling_period(mut self, period: SamplingPeriod) -> Self {
        self.default_sampling_period = period;
        self
    }
}
