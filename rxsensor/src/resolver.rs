// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::subsystem::SensorSubsystem;
use rxsensor_core::{SensorDescriptor, SensorHandle, SensorKind};
use std::sync::Arc;

/// Maps a sensor kind to the concrete sensor the device exposes for it.
///
/// Resolution is a read-only lookup against the subsystem; a missing sensor is reported as
/// `None`, which callers are expected to handle. The resolver holds no state of its own and can
/// be shared and called from any thread.
#[derive(Clone)]
pub struct SensorHandleResolver {
    subsystem: Arc<dyn SensorSubsystem>,
}

impl SensorHandleResolver {
    pub fn new(subsystem: Arc<dyn SensorSubsystem>) -> Self {
        Self { subsystem }
    }

    #[must_use]
    pub fn resolve(&self, descriptor: &SensorDescriptor) -> Option<SensorHandle> {
        self.resolve_kind(descriptor.kind())
    }

    #[must_use]
    pub fn resolve_kind(&self, kind: SensorKind) -> Option<SensorHandle> {
        self.subsystem.default_sensor(kind)
    }

    #[must_use]
    pub fn is_available(&self, kind: SensorKind) -> bool {
        self.resolve_kind(kind).is_some()
    }

    /// Distinct kinds of all sensors on the device, in subsystem order.
    #[must_use]
    pub fn available_kinds(&self) -> Vec<SensorKind> {
        let mut kinds = Vec::new();
        for handle in self.subsystem.sensor_list() {
            if !kinds.contains(&handle.kind()) {
                kinds.push(handle.kind());
            }
        }
        kinds
    }
}

impl core::fmt::Debug for SensorHandleResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorHandleResolver").finish_non_exhaustive()
    }
}
