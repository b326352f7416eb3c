// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the rxsensor crates.
//!
//! This crate provides a scriptable in-memory sensor subsystem, sensor fixtures and stream
//! assertion helpers. It is meant for development and testing only, not for production code.
//!
//! # Key Types
//!
//! ## `MockSensorSubsystem`
//!
//! A [`SensorSubsystem`](rxsensor::SensorSubsystem) whose sensors, registration outcomes and
//! deregistration failures are configured by the test, and which records every call it receives
//! in order:
//!
//! ```rust
//! use rxsensor_test_utils::{fixtures, MockSensorSubsystem, SubsystemCall};
//! use rxsensor_core::SensorKind;
//!
//! let mock = MockSensorSubsystem::new().with_sensor(fixtures::accelerometer());
//! assert_eq!(mock.emit_sample(SensorKind::Accelerometer, vec![0.0, 0.0, 9.81], 1), 0);
//! assert!(mock.calls().is_empty());
//! ```
//!
//! Events are pushed with [`MockSensorSubsystem::emit_sample`] and
//! [`MockSensorSubsystem::fire_trigger`]; listeners are invoked on the calling thread with no
//! lock held, so a test can play the subsystem's notification thread from any thread it likes.
//!
//! ## Using Assertion Helpers
//!
//! ```rust
//! use rxsensor_test_utils::assert_no_element_emitted;
//! use futures::stream;
//!
//! # async fn example() {
//! let mut empty = stream::pending::<i32>();
//! assert_no_element_emitted(&mut empty, 10).await;
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod fixtures;
pub mod helpers;
pub mod mock_subsystem;

// Re-export commonly used test utilities
pub use helpers::{assert_no_element_emitted, expect_end, expect_next, poll_once, wait_until};
pub use mock_subsystem::{MockSensorSubsystem, SubsystemCall, UnregisterFailure};
