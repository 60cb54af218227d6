// src/spi/mod.rs

//! Read-only synchronous serial bus driven entirely in software.
//!
//! The host owns the clock and select lines and samples the data line once
//! per clock period, MSB first. No hardware SPI peripheral is involved, so
//! any three GPIOs will do.

pub mod max6675;

use crate::common::{
    error::SensorError,
    hal_traits::{Clock, PinIo},
    pin::{BusPins, PinMode},
};
use core::ops::{Deref, DerefMut};
use embedded_hal::digital::PinState;
use log::warn;

/// A bit-banged bus on three pins.
#[derive(Debug)]
pub struct BitBangBus<IF>
where
    IF: PinIo + Clock,
{
    interface: IF,
    pins: BusPins,
    half_period_us: u32,
}

impl<IF> BitBangBus<IF>
where
    IF: PinIo + Clock,
{
    pub fn new(interface: IF, pins: BusPins, half_period_us: u32) -> Self {
        BitBangBus { interface, pins, half_period_us }
    }

    /// Data as input, clock and select as outputs.
    pub fn configure(&mut self) -> Result<(), SensorError<IF::Error>> {
        self.interface.configure_pin(self.pins.data, PinMode::Input).map_err(SensorError::Io)?;
        self.interface.configure_pin(self.pins.clock, PinMode::Output).map_err(SensorError::Io)?;
        self.interface.configure_pin(self.pins.select, PinMode::Output).map_err(SensorError::Io)?;
        Ok(())
    }

    /// Holds the select line low for `low_ms`, then releases it.
    pub fn pulse_select(&mut self, low_ms: u32) -> Result<(), SensorError<IF::Error>> {
        self.write_select(PinState::Low)?;
        self.interface.delay_ms(low_ms);
        self.write_select(PinState::High)
    }

    /// Asserts the select line. The returned guard deasserts it when dropped.
    pub fn select(&mut self) -> Result<Selected<'_, IF>, SensorError<IF::Error>> {
        self.write_select(PinState::Low)?;
        Ok(Selected { bus: self })
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.interface.delay_ms(ms);
    }

    fn write_select(&mut self, state: PinState) -> Result<(), SensorError<IF::Error>> {
        self.interface.write_pin(self.pins.select, state).map_err(SensorError::Io)
    }

    fn read_bit(&mut self) -> Result<bool, SensorError<IF::Error>> {
        self.interface.write_pin(self.pins.clock, PinState::Low).map_err(SensorError::Io)?;
        self.interface.delay_us(self.half_period_us);
        let level = self.interface.read_pin(self.pins.data).map_err(SensorError::Io)?;
        self.interface.write_pin(self.pins.clock, PinState::High).map_err(SensorError::Io)?;
        self.interface.delay_us(self.half_period_us);
        Ok(level == PinState::High)
    }
}

/// A selected bus. Reads are only possible through this guard.
pub struct Selected<'a, IF>
where
    IF: PinIo + Clock,
{
    bus: &'a mut BitBangBus<IF>,
}

impl<IF> Selected<'_, IF>
where
    IF: PinIo + Clock,
{
    /// Clocks in eight bits, most significant first.
    pub fn read_byte(&mut self) -> Result<u8, SensorError<IF::Error>> {
        let mut value = 0u8;
        for _ in 0..8 {
            value = (value << 1) | u8::from(self.bus.read_bit()?);
        }
        Ok(value)
    }

    /// Clocks in two bytes; the first one is the high byte.
    pub fn read_u16(&mut self) -> Result<u16, SensorError<IF::Error>> {
        let high = self.read_byte()?;
        let low = self.read_byte()?;
        Ok(u16::from_be_bytes([high, low]))
    }
}

impl<IF> Deref for Selected<'_, IF>
where
    IF: PinIo + Clock,
{
    type Target = BitBangBus<IF>;

    fn deref(&self) -> &Self::Target {
        self.bus
    }
}

impl<IF> DerefMut for Selected<'_, IF>
where
    IF: PinIo + Clock,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.bus
    }
}

impl<IF> Drop for Selected<'_, IF>
where
    IF: PinIo + Clock,
{
    fn drop(&mut self) {
        if let Err(e) = self.bus.write_select(PinState::High) {
            warn!("bus: select line {} not released: {}", self.bus.pins.select, e);
        }
    }
}
