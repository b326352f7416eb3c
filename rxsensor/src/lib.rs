// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # RxSensor
//!
//! Async streams over a callback-driven hardware sensor subsystem.
//!
//! ## Overview
//!
//! A sensor subsystem pushes events to registered listeners from its own notification thread.
//! [`SensorStreamAdapter`] turns that into two kinds of [`Stream`](futures::Stream):
//!
//! - [`SensorStream`]: every sensor callback becomes one [`SensorSample`], until cancelled
//! - [`TriggerStream`]: a one-shot trigger yields one [`TriggerSignal`] and completes
//!
//! Streams are cold. The sensor is resolved and the listener registered on the first poll, and
//! the listener is deregistered exactly once however the stream ends: cancellation, drop, the
//! trigger firing, or a failed start.
//!
//! ## Backpressure
//!
//! The handoff from the notification thread to the consumer holds at most one sample. If a new
//! sample arrives before the consumer took the previous one, the previous one is discarded.
//! The notification thread never blocks and memory never grows; a slow consumer simply sees the
//! most recent reading.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use rxsensor::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run(subsystem: Arc<dyn SensorSubsystem>) {
//! let adapter = SensorStreamAdapter::new(subsystem);
//! let mut samples = adapter.continuous_stream(
//!     SensorKind::Accelerometer,
//!     SamplingPeriod::Game,
//!     Duration::ZERO,
//! );
//!
//! while let Some(item) = samples.next().await {
//!     match item {
//!         StreamItem::Value(sample) => println!("{:?}", sample.values()),
//!         StreamItem::Error(error) => {
//!             eprintln!("{error}");
//!             break;
//!         }
//!     }
//! }
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod adapter;
pub mod config;
pub mod continuous;
pub mod resolver;
pub mod subscription;
pub mod subsystem;
pub mod trigger;

pub use self::adapter::SensorStreamAdapter;
pub use self::config::{AdapterConfig, LatencySupport};
pub use self::continuous::SensorStream;
pub use self::resolver::SensorHandleResolver;
pub use self::subscription::{SubscriptionHandle, SubscriptionState};
pub use self::subsystem::{
    ListenerId, RawSensorEvent, RawTriggerEvent, SensorEventListener, SensorSubsystem,
    SubsystemCapabilities, SubsystemError, TriggerEventListener,
};
pub use self::trigger::TriggerStream;

// Re-export core types
pub use rxsensor_core::{
    CancellableStream, CancellationToken, ReportingMode, SamplingPeriod, SensorAccuracy,
    SensorDescriptor, SensorError, SensorHandle, SensorKind, SensorSample, StreamItem,
    TriggerSignal,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AdapterConfig, SensorStream, SensorStreamAdapter, SensorSubsystem, SubscriptionHandle,
        TriggerStream,
    };
    pub use rxsensor_core::{
        CancellableStream, SamplingPeriod, SensorDescriptor, SensorError, SensorKind,
        SensorSample, StreamItem, TriggerSignal,
    };
}
