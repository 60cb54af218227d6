//! MH-Zxx command definitions.
//!
//! Every command is sent as a 9-byte frame; see [`frame`](super::frame) for
//! the layout. Only the concentration read produces a response.

use super::frame::{build_request, Frame};

/// Precomputed request for [`Command::ReadGasConcentration`].
pub const READ_GAS_CONCENTRATION_REQUEST: Frame =
    [0xFF, 0x01, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00, 0x79];

/// Represents an MH-Zxx command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read CO2 concentration (`0x86`). The sensor answers with one frame.
    ReadGasConcentration,

    /// Zero point calibration (`0x87`). The sensor must sit in 400 ppm air for
    /// at least 20 minutes beforehand.
    CalibrateZeroPoint,

    /// Span point calibration (`0x88`) against a reference gas of `ppm`.
    CalibrateSpan { ppm: u16 },

    /// Automatic baseline correction on or off (`0x79`).
    AutoBaselineCorrection { enabled: bool },

    /// Detection range (`0x99`), typically 2000 or 5000 ppm.
    DetectionRange { ppm: u16 },
}

impl Command {
    /// The command byte placed at offset 2 of the request.
    pub const fn code(&self) -> u8 {
        match self {
            Command::ReadGasConcentration => 0x86,
            Command::CalibrateZeroPoint => 0x87,
            Command::CalibrateSpan { .. } => 0x88,
            Command::AutoBaselineCorrection { .. } => 0x79,
            Command::DetectionRange { .. } => 0x99,
        }
    }

    /// Whether the sensor replies to this command.
    pub const fn requires_response(&self) -> bool {
        matches!(self, Command::ReadGasConcentration)
    }

    /// Encodes the command into a complete request frame, checksum included.
    pub fn to_frame(&self) -> Frame {
        let arguments = match *self {
            Command::ReadGasConcentration | Command::CalibrateZeroPoint => [0; 5],
            Command::CalibrateSpan { ppm } => {
                let [high, low] = ppm.to_be_bytes();
                [high, low, 0, 0, 0]
            }
            Command::AutoBaselineCorrection { enabled } => {
                [if enabled { 0xA0 } else { 0x00 }, 0, 0, 0, 0]
            }
            Command::DetectionRange { ppm } => {
                let [high, low] = ppm.to_be_bytes();
                [0, 0, 0, high, low]
            }
        };
        build_request(self.code(), arguments)
    }
}
