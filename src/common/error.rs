// src/common/error.rs

use super::status::{MetricKind, StatusCode};

/// Every way an acquisition can fail.
///
/// `E` is the error type of the hardware interface that was driving the read.
#[derive(Debug, thiserror::Error)]
pub enum SensorError<E = ()>
where
    E: core::fmt::Debug, // Still need Debug for the generic Io error
{
    /// Underlying I/O error from the HAL implementation.
    #[error("I/O error: {0:?}")] // Format string requires Debug on E
    Io(E),

    /// The device stopped talking, or a PWM cycle did not finish in time.
    #[error("Operation timed out")]
    Timeout,

    /// Response did not begin with the start marker.
    #[error("Unexpected start byte: {0:#04x}")]
    WrongAnswer(u8),

    /// Received checksum does not match the recomputed one.
    #[error("Checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// The identifier bit of the converter register was set.
    #[error("Wrong device ID bit in register {0:#06x}")]
    WrongId(u16),

    /// No thermocouple attached to the converter.
    #[error("Thermocouple input open, register {0:#06x}")]
    OpenCircuit(u16),

    /// The PWM line never went low within the cycle budget.
    #[error("No low level on the PWM line")]
    NoLowLevel,

    /// The PWM line went low but never came back high within the cycle budget.
    #[error("No high level after the low level on the PWM line")]
    NoHighLevel,

    /// A complete PWM cycle was too short to apply the edge correction.
    #[error("Degenerate PWM cycle: high {high_ms} ms, low {low_ms} ms")]
    DegenerateCycle { high_ms: u32, low_ms: u32 },

    /// The device cannot measure the requested metric.
    #[error("Metric {0:?} is not supported by this device")]
    Unsupported(MetricKind),
}

impl<E: core::fmt::Debug> SensorError<E> {
    /// The status code reported to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            SensorError::Timeout => StatusCode::Timeout,
            SensorError::WrongAnswer(_) => StatusCode::WrongAnswer,
            SensorError::ChecksumMismatch { .. } => StatusCode::Checksum,
            SensorError::WrongId(_) => StatusCode::WrongId,
            SensorError::OpenCircuit(_) => StatusCode::Connect,
            SensorError::NoLowLevel => StatusCode::AckL,
            SensorError::NoHighLevel => StatusCode::AckH,
            SensorError::Io(_)
            | SensorError::DegenerateCycle { .. }
            | SensorError::Unsupported(_) => StatusCode::Fail,
        }
    }
}
