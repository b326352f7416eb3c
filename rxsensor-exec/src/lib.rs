// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Callback-style consumption of rxsensor streams.
//!
//! [`SubscribeExt::subscribe`] drives a stream to its end, routing elements, the terminal error
//! and completion to separate callbacks, and cancels the underlying registration when the
//! supplied [`CancellationToken`](rxsensor_core::CancellationToken) fires.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod subscribe;
#[cfg(feature = "runtime-tokio")]
pub mod task;

// Re-export commonly used types
pub use subscribe::{SubscribeExt, SubscriptionOutcome};
#[cfg(feature = "runtime-tokio")]
pub use task::{spawn_subscription, SubscriptionTask};
