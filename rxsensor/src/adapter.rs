// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::{AdapterConfig, LatencySupport};
use crate::continuous::{Continuous, SensorStream};
use crate::resolver::SensorHandleResolver;
use crate::subscription::Subscription;
use crate::subsystem::SensorSubsystem;
use crate::trigger::{OneShot, TriggerStream};
use core::time::Duration;
use rxsensor_core::{SamplingPeriod, SensorDescriptor, SensorKind};
use std::sync::Arc;

/// Entry point: hands out streams backed by a [`SensorSubsystem`].
///
/// Every call returns a new, cold stream. Nothing touches the subsystem until the stream is
/// polled, and every stream owns its own listener registration. The adapter itself is cheap to
/// clone and can be shared between threads.
///
/// Whether the subsystem honours a maximum report latency is decided once, when the adapter is
/// built. On subsystems without that capability the latency is dropped and only the sampling
/// period is passed on.
#[derive(Clone)]
pub struct SensorStreamAdapter {
    subsystem: Arc<dyn SensorSubsystem>,
    resolver: SensorHandleResolver,
    supports_report_latency: bool,
    default_sampling_period: SamplingPeriod,
}

impl SensorStreamAdapter {
    pub fn new(subsystem: Arc<dyn SensorSubsystem>) -> Self {
        Self::with_config(subsystem, AdapterConfig::default())
    }

    pub fn with_config(subsystem: Arc<dyn SensorSubsystem>, config: AdapterConfig) -> Self {
        let supports_report_latency = match config.report_latency {
            LatencySupport::Detect => subsystem.capabilities().supports_report_latency,
            LatencySupport::Force(supported) => supported,
        };
        debug!(supports_report_latency, "sensor stream adapter ready");

        Self {
            resolver: SensorHandleResolver::new(subsystem.clone()),
            subsystem,
            supports_report_latency,
            default_sampling_period: config.default_sampling_period,
        }
    }

    /// Continuous samples from the default sensor of `kind`.
    ///
    /// The stream yields [`StreamItem::Error`](rxsensor_core::StreamItem::Error) with
    /// [`SensorError::SensorUnavailable`](rxsensor_core::SensorError::SensorUnavailable) if the
    /// device has no such sensor, or
    /// [`SensorError::RegistrationFailed`](rxsensor_core::SensorError::RegistrationFailed) if the
    /// subsystem refuses the listener, and then ends.
    #[must_use]
    pub fn continuous_stream(
        &self,
        kind: SensorKind,
        sampling_period: SamplingPeriod,
        max_report_latency: Duration,
    ) -> SensorStream {
        self.continuous_stream_with(
            SensorDescriptor::new(kind)
                .with_sampling_period(sampling_period)
                .with_max_report_latency(max_report_latency),
        )
    }

    #[must_use]
    pub fn continuous_stream_with(&self, descriptor: SensorDescriptor) -> SensorStream {
        let max_report_latency = self
            .supports_report_latency
            .then(|| descriptor.max_report_latency());
        let protocol = Continuous {
            sampling_period: descriptor.sampling_period(),
            max_report_latency,
        };
        SensorStream::new(Subscription::new(
            descriptor.kind(),
            protocol,
            self.subsystem.clone(),
            self.resolver.clone(),
        ))
    }

    /// Continuous samples without hardware batching.
    #[must_use]
    pub fn observe_sensor(&self, kind: SensorKind, sampling_period: SamplingPeriod) -> SensorStream {
        self.continuous_stream(kind, sampling_period, Duration::ZERO)
    }

    /// Continuous samples at the configured default period, without batching.
    #[must_use]
    pub fn observe(&self, kind: SensorKind) -> SensorStream {
        self.observe_sensor(kind, self.default_sampling_period)
    }

    /// One trigger event from the default sensor of `kind`, then completion.
    #[must_use]
    pub fn single_trigger_stream(&self, kind: SensorKind) -> TriggerStream {
        TriggerStream::new(Subscription::new(
            kind,
            OneShot,
            self.subsystem.clone(),
            self.resolver.clone(),
        ))
    }

    #[must_use]
    pub fn resolver(&self) -> &SensorHandleResolver {
        &self.resolver
    }

    #[must_use]
    pub fn supports_report_latency(&self) -> bool {
        self.supports_report_latency
    }
}

impl core::fmt::Debug for SensorStreamAdapter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorStreamAdapter")
            .field("supports_report_latency", &self.supports_report_latency)
            .field("default_sampling_period", &self.default_sampling_period)
            .finish_non_exhaustive()
    }
}
