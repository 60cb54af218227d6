// src/common/pin.rs

use core::fmt;

/// A board pin number, as understood by the [`PinIo`](super::hal_traits::PinIo)
/// implementation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Pin(u8);

impl Pin {
    #[inline]
    pub const fn new(number: u8) -> Self {
        Pin(number)
    }

    #[inline]
    pub const fn number(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Pin {
    fn from(value: u8) -> Self {
        Pin(value)
    }
}

impl From<Pin> for u8 {
    fn from(value: Pin) -> Self {
        value.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

/// Electrical configuration requested for a pin before it is used.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PinMode {
    /// Floating input.
    Input,
    /// Input with the internal pull-up enabled (idle level HIGH).
    InputPullUp,
    /// Push-pull output.
    Output,
}

/// Pin assignment for a three-wire read-only SPI-like bus (MISO, SCLK, CS).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BusPins {
    /// Data line, sampled by the host.
    pub data: Pin,
    /// Clock line, driven by the host.
    pub clock: Pin,
    /// Chip-select line, active low.
    pub select: Pin,
}

impl BusPins {
    pub const fn new(data: Pin, clock: Pin, select: Pin) -> Self {
        BusPins { data, clock, select }
    }
}

/// Pin assignment for a (software) UART.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SerialPins {
    pub rx: Pin,
    pub tx: Pin,
}

impl SerialPins {
    pub const fn new(rx: Pin, tx: Pin) -> Self {
        SerialPins { rx, tx }
    }
}
