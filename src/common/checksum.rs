// src/common/checksum.rs

use super::error::SensorError;
use super::frame::{Frame, CHECKSUM_BYTE, FRAME_SIZE};

/// Calculates the Winsen frame checksum over a payload region.
///
/// The checksum is the two's complement of the modular byte sum:
/// `0xFF - (sum mod 256) + 1`. A payload whose bytes sum to zero yields zero.
///
/// # Arguments
///
/// * `payload`: the bytes between the start marker and the checksum byte.
///
/// # Returns
///
/// The checksum byte.
#[inline]
pub fn checksum(payload: &[u8]) -> u8 {
    let sum = payload.iter().fold(0u8, |acc, byte| acc.wrapping_add(*byte));
    0xFFu8.wrapping_sub(sum).wrapping_add(1)
}

/// Calculates the checksum a complete frame should carry in its last byte.
///
/// The start marker (byte 0) and the checksum byte itself are excluded.
#[inline]
pub fn frame_checksum(frame: &Frame) -> u8 {
    checksum(&frame[1..FRAME_SIZE - 1])
}

/// Verifies the trailing checksum byte of a received frame.
///
/// # Returns
///
/// * `Ok(())` if the checksum is valid.
/// * `Err(SensorError::ChecksumMismatch)` carrying the received and recomputed bytes.
pub fn verify_frame_checksum<E>(frame: &Frame) -> Result<(), SensorError<E>>
where
    E: core::fmt::Debug,
{
    let calculated = frame_checksum(frame);
    let expected = frame[CHECKSUM_BYTE];

    if calculated == expected {
        Ok(())
    } else {
        Err(SensorError::ChecksumMismatch { expected, calculated })
    }
}
