// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod checksum;
pub mod command;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod pin;
pub mod status;
pub mod timing;

#[cfg(test)]
pub(crate) mod mock;

// --- Re-export key types/traits/functions for easier access ---

// From checksum.rs
pub use checksum::{checksum, frame_checksum, verify_frame_checksum};

// From command.rs
pub use command::Command;

// From error.rs
pub use error::SensorError;

// From frame.rs
pub use frame::{Frame, FRAME_SIZE};

// From hal_traits.rs
pub use hal_traits::{Clock, Instrumentation, PeriodicTimer, PinIo, SerialPort};

// From pin.rs
pub use pin::{BusPins, Pin, PinMode, SerialPins};

// From status.rs
pub use status::{MetricKind, MetricResult, StatusCode};

// From timing.rs (constants - users can access via common::timing::*)
pub use timing::{Timings, WarmupDeadline};
