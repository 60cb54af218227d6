// src/spi/max6675.rs

//! MAX6675 cold-junction-compensated thermocouple-to-digital converter.
//!
//! The converter shifts out one 16-bit word per selection:
//!
//! | Bit   | Meaning                                   |
//! |-------|-------------------------------------------|
//! | 15    | dummy sign bit, always 0 on a real device |
//! | 14..3 | temperature, 0.25 °C per count            |
//! | 2     | thermocouple input open                   |
//! | 1     | device ID, 0                              |
//! | 0     | three-state                               |

use super::BitBangBus;
use crate::common::{
    error::SensorError,
    hal_traits::{Clock, PinIo},
    pin::BusPins,
    status::MetricKind,
    timing::{self, Timings},
};
use log::debug;

/// Set when the word does not come from a MAX6675.
pub const BITMASK_ID: u16 = 0x8000;
/// Set when no thermocouple is attached.
pub const BITMASK_THERMOCOUPLE_INPUT: u16 = 0x0004;
/// Reserved low bits dropped before scaling.
pub const RESERVED_LOW_BITS: u32 = 3;
/// One count is 0.25 °C, i.e. 25 hundredths.
pub const HUNDREDTHS_PER_COUNT: i32 = 25;

/// Interprets a raw register word.
///
/// # Returns
///
/// The temperature in hundredths of a degree Celsius.
pub fn decode_register<E>(raw: u16) -> Result<i32, SensorError<E>>
where
    E: core::fmt::Debug,
{
    if raw & BITMASK_ID != 0 {
        return Err(SensorError::WrongId(raw));
    }
    if raw & BITMASK_THERMOCOUPLE_INPUT != 0 {
        return Err(SensorError::OpenCircuit(raw));
    }
    Ok(i32::from(raw >> RESERVED_LOW_BITS) * HUNDREDTHS_PER_COUNT)
}

/// A MAX6675 on a bit-banged bus.
#[derive(Debug)]
pub struct Max6675<IF>
where
    IF: PinIo + Clock,
{
    bus: BitBangBus<IF>,
    conversion_ms: u32,
}

impl<IF> Max6675<IF>
where
    IF: PinIo + Clock,
{
    pub fn new(interface: IF, pins: BusPins, timings: &Timings) -> Self {
        Max6675 {
            bus: BitBangBus::new(interface, pins, timings.bus_half_period_us),
            conversion_ms: timings.max6675_conversion_ms,
        }
    }

    /// Starts a fresh conversion, waits for it and reads the result.
    ///
    /// Only [`MetricKind::Temperature`] is supported; anything else fails
    /// before any pin is touched. The select line is high again on return,
    /// whatever the outcome.
    pub fn read(&mut self, metric: MetricKind) -> Result<i32, SensorError<IF::Error>> {
        if metric != MetricKind::Temperature {
            return Err(SensorError::Unsupported(metric));
        }

        self.bus.configure()?;

        // Pulsing select aborts the running conversion and starts a new one
        self.bus.pulse_select(timing::MAX6675_RESTART_PULSE_MS)?;
        self.bus.delay_ms(self.conversion_ms);

        let raw = {
            let mut selected = self.bus.select()?;
            selected.delay_ms(timing::MAX6675_SELECT_SETUP_MS);
            selected.read_u16()?
        };

        decode_register(raw).inspect_err(|e| debug!("max6675: raw {:#06x} rejected: {}", raw, e))
    }
}
