// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types and primitives shared by the rxsensor crates.
//!
//! This crate holds everything that does not depend on a concrete sensor subsystem:
//!
//! - the sensor data model ([`SensorKind`], [`SensorHandle`], [`SensorSample`], [`TriggerSignal`],
//!   [`SensorDescriptor`])
//! - the error taxonomy ([`SensorError`]) and the in-band [`StreamItem`] carrier
//! - [`LatestSlot`], the capacity-1 overwrite handoff between a callback thread and a stream
//! - [`Teardown`], a single-execution guard for cleanup
//! - [`CancellationToken`], a runtime-agnostic cancellation signal

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod cancellable_stream;
pub mod cancellation_token;
pub mod latest_slot;
pub mod sampling;
pub mod sensor_error;
pub mod sensor_event;
pub mod sensor_handle;
pub mod sensor_kind;
pub mod stream_item;
pub mod teardown;

pub use self::cancellable_stream::CancellableStream;
pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::latest_slot::{LatestSlot, Offer};
pub use self::sampling::{SamplingPeriod, SensorDescriptor};
pub use self::sensor_error::{Result, SensorError};
pub use self::sensor_event::{SensorAccuracy, SensorSample, TriggerSignal};
pub use self::sensor_handle::SensorHandle;
pub use self::sensor_kind::{ReportingMode, SensorKind};
pub use self::stream_item::StreamItem;
pub use self::teardown::Teardown;
