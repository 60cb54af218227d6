// src/common/frame.rs

//! Layout of the 9-byte Winsen MH-Zxx serial frame.
//!
//! Requests and responses share the same length, start marker and checksum
//! position; only the meaning of bytes 1..=7 differs.
//!
//! | Offset | Request            | Response                 |
//! |--------|--------------------|--------------------------|
//! | 0      | `0xFF`             | `0xFF`                   |
//! | 1      | sensor number      | command echo             |
//! | 2      | command            | concentration high byte  |
//! | 3      | argument / `0x00`  | concentration low byte   |
//! | 4..=7  | argument / `0x00`  | device specific          |
//! | 8      | checksum           | checksum                 |

use super::checksum::{checksum, verify_frame_checksum};
use super::error::SensorError;

/// Number of bytes in every request and response frame.
pub const FRAME_SIZE: usize = 9;

/// A complete request or response frame.
pub type Frame = [u8; FRAME_SIZE];

/// Value every frame starts with.
pub const START_MARKER: u8 = 0xFF;
/// Sensor number used in requests; MH-Zxx sensors always answer to 1.
pub const DEFAULT_SENSOR_NUMBER: u8 = 0x01;

pub const START_BYTE: usize = 0;
pub const SENSOR_NUMBER_BYTE: usize = 1;
pub const COMMAND_BYTE: usize = 2;
/// First of the five request argument bytes (3..=7).
pub const ARGUMENT_BYTES: usize = 3;
pub const RESPONSE_COMMAND_BYTE: usize = 1;
pub const CONCENTRATION_HIGH_BYTE: usize = 2;
pub const CONCENTRATION_LOW_BYTE: usize = 3;
pub const CHECKSUM_BYTE: usize = FRAME_SIZE - 1;

/// Builds a request frame for `command` with the five argument bytes,
/// filling in the start marker, sensor number and checksum.
pub fn build_request(command: u8, arguments: [u8; 5]) -> Frame {
    let mut frame = [0u8; FRAME_SIZE];
    frame[START_BYTE] = START_MARKER;
    frame[SENSOR_NUMBER_BYTE] = DEFAULT_SENSOR_NUMBER;
    frame[COMMAND_BYTE] = command;
    frame[ARGUMENT_BYTES..CHECKSUM_BYTE].copy_from_slice(&arguments);
    frame[CHECKSUM_BYTE] = checksum(&frame[1..CHECKSUM_BYTE]);
    frame
}

/// Validates a gas concentration response and extracts the ppm value.
///
/// The start marker is checked before the checksum, so a desynchronised
/// stream is reported as a wrong answer rather than as corruption.
pub fn decode_concentration<E>(frame: &Frame) -> Result<u16, SensorError<E>>
where
    E: core::fmt::Debug,
{
    if frame[START_BYTE] != START_MARKER {
        return Err(SensorError::WrongAnswer(frame[START_BYTE]));
    }

    verify_frame_checksum(frame)?;

    Ok(u16::from_be_bytes([
        frame[CONCENTRATION_HIGH_BYTE],
        frame[CONCENTRATION_LOW_BYTE],
    ]))
}
