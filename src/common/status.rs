// src/common/status.rs

use super::error::SensorError;
use core::fmt;

/// Status code returned by every metric read.
///
/// Success codes are positive and tell the caller how to scale the value;
/// failure codes are negative. The numeric values are stable and are what
/// the reporting layer forwards upstream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum StatusCode {
    /// Success, the value is a plain unsigned integer.
    UnsignedValue = 1,
    /// Success, the value is fixed point with two implied decimal digits.
    Float02Digit = 2,
    /// Generic failure (unsupported metric, bus I/O error, unusable data).
    Fail = -1,
    /// Device not connected (e.g. open thermocouple input).
    Connect = -2,
    /// No low level seen where one was expected.
    AckL = -3,
    /// No high level seen where one was expected.
    AckH = -4,
    /// Checksum mismatch.
    Checksum = -5,
    /// Device stopped answering.
    Timeout = -6,
    /// Device identification bit wrong.
    WrongId = -7,
    /// Response malformed (wrong start byte).
    WrongAnswer = -8,
}

impl StatusCode {
    #[inline]
    pub const fn code(self) -> i8 {
        self as i8
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        (self as i8) > 0
    }

    /// Number of implied decimal digits in a value reported with this code,
    /// or `None` for failure codes.
    pub const fn decimal_digits(self) -> Option<u8> {
        match self {
            StatusCode::UnsignedValue => Some(0),
            StatusCode::Float02Digit => Some(2),
            _ => None,
        }
    }
}

impl From<StatusCode> for i8 {
    fn from(value: StatusCode) -> Self {
        value.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::UnsignedValue => "UNSIGNED_VALUE",
            StatusCode::Float02Digit => "FLOAT_02_DIGIT",
            StatusCode::Fail => "FAIL",
            StatusCode::Connect => "CONNECT",
            StatusCode::AckL => "ACK_L",
            StatusCode::AckH => "ACK_H",
            StatusCode::Checksum => "CHECKSUM",
            StatusCode::Timeout => "TIMEOUT",
            StatusCode::WrongId => "WRONG_ID",
            StatusCode::WrongAnswer => "WRONG_ANSWER",
        };
        write!(f, "{}({})", name, self.code())
    }
}

/// The quantity the reporting layer asks a device for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Temperature,
    Humidity,
    Pressure,
    Co2,
}

/// Outcome of one metric read: a status code and, on success only, a value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MetricResult {
    status: StatusCode,
    value: Option<i32>,
}

impl MetricResult {
    /// A successful read.
    ///
    /// A failure `status` keeps the status and drops `value`.
    pub fn success(status: StatusCode, value: i32) -> Self {
        MetricResult {
            status,
            value: status.is_success().then_some(value),
        }
    }

    /// A failed read carrying no value.
    ///
    /// A success `status` has no value to report and becomes [`StatusCode::Fail`].
    pub fn failure(status: StatusCode) -> Self {
        let status = if status.is_success() { StatusCode::Fail } else { status };
        MetricResult { status, value: None }
    }

    /// Flattens a driver outcome, reporting a success as `success_status`.
    pub fn from_outcome<E>(outcome: Result<i32, SensorError<E>>, success_status: StatusCode) -> Self
    where
        E: core::fmt::Debug,
    {
        match outcome {
            Ok(value) => MetricResult::success(success_status, value),
            Err(e) => MetricResult::failure(e.status()),
        }
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn value(&self) -> Option<i32> {
        self.value
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
