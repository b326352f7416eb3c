// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::SensorKind;
use core::fmt;
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq, Hash)]
struct HandleInfo {
    id: u32,
    kind: SensorKind,
    name: String,
    vendor: String,
}

/// Reference to a concrete sensor instance exposed by a subsystem.
///
/// Handles are produced by the subsystem and are cheap to clone. Two handles are equal when
/// they describe the same sensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SensorHandle {
    info: Arc<HandleInfo>,
}

impl SensorHandle {
    pub fn new(id: u32, kind: SensorKind, name: impl Into<String>, vendor: impl Into<String>) -> Self {
        Self {
            info: Arc::new(HandleInfo {
                id,
                kind,
                name: name.into(),
                vendor: vendor.into(),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.info.id
    }

    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.info.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.info.vendor
    }
}

impl fmt::Display for SensorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, id {})", self.info.name, self.info.kind, self.info.id)
    }
}
