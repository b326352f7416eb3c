// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::SensorKind;
use core::time::Duration;

/// Requested delay between continuous sensor events.
///
/// The presets mirror the standard subsystem delay constants. The subsystem treats the period as
/// a hint and may deliver events faster or slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplingPeriod {
    /// As fast as the hardware allows.
    Fastest,
    /// Suitable for games (20 ms).
    Game,
    /// Suitable for user interface updates (66.667 ms).
    Ui,
    /// Suitable for screen orientation changes (200 ms).
    #[default]
    Normal,
    Custom(Duration),
}

impl SamplingPeriod {
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        match self {
            Self::Fastest => Duration::ZERO,
            Self::Game => Duration::from_micros(20_000),
            Self::Ui => Duration::from_micros(66_667),
            Self::Normal => Duration::from_micros(200_000),
            Self::Custom(period) => period,
        }
    }

    /// Period in microseconds, saturating at `u32::MAX`.
    #[must_use]
    pub fn as_micros(self) -> u32 {
        u32::try_from(self.as_duration().as_micros()).unwrap_or(u32::MAX)
    }
}

/// Everything needed to request a stream for one sensor kind.
///
/// A descriptor is a value: once handed to the adapter it is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorDescriptor {
    kind: SensorKind,
    sampling_period: SamplingPeriod,
    max_report_latency: Duration,
}

impl SensorDescriptor {
    /// Descriptor with the `Normal` sampling period and no batching.
    #[must_use]
    pub const fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            sampling_period: SamplingPeriod::Normal,
            max_report_latency: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn with_sampling_period(mut self, sampling_period: SamplingPeriod) -> Self {
        self.sampling_period = sampling_period;
        self
    }

    /// Maximum time events may be batched in hardware before being reported.
    #[must_use]
    pub const fn with_max_report_latency(mut self, max_report_latency: Duration) -> Self {
        self.max_report_latency = max_report_latency;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> SensorKind {
        self.kind
    }

    #[must_use]
    pub const fn sampling_period(&self) -> SamplingPeriod {
        self.sampling_period
    }

    #[must_use]
    pub const fn max_report_latency(&self) -> Duration {
        self.max_report_latency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_subsystem_delays() {
        assert_eq!(SamplingPeriod::Fastest.as_micros(), 0);
        assert_eq!(SamplingPeriod::Game.as_micros(), 20_000);
        assert_eq!(SamplingPeriod::Ui.as_micros(), 66_667);
        assert_eq!(SamplingPeriod::Normal.as_micros(), 200_000);
    }

    #[test]
    fn custom_period_saturates() {
        let huge = SamplingPeriod::Custom(Duration::from_secs(u64::from(u32::MAX)));
        assert_eq!(huge.as_micros(), u32::MAX);
    }

    #[test]
    fn descriptor_defaults_to_normal_without_batching() {
        let descriptor = SensorDescriptor::new(SensorKind::Gyroscope);
        assert_eq!(descriptor.sampling_period(), SamplingPeriod::Normal);
        assert_eq!(descriptor.max_report_latency(), Duration::ZERO);

        let tuned = descriptor
            .with_sampling_period(SamplingPeriod::Game)
            .with_max_report_latency(Duration::from_millis(500));
        assert_eq!(tuned.kind(), SensorKind::Gyroscope);
        assert_eq!(tuned.sampling_period(), SamplingPeriod::Game);
        assert_eq!(tuned.max_report_latency(), Duration::from_millis(500));
    }
}
