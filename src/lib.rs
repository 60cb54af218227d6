// src/lib.rs

#![cfg_attr(not(test), no_std)] // no_std on target, std for the unit-test harness

pub mod common;
pub mod metric;
pub mod pwm;
pub mod spi;
pub mod uart;

// Re-export key types for convenience
pub use common::{MetricResult, SensorError, StatusCode};
pub use metric::MetricKind;
