// src/common/hal_traits.rs

use super::pin::{Pin, PinMode, SerialPins};
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

/// Free-running millisecond clock plus blocking delays.
///
/// Delays come from `embedded_hal::delay::DelayNs`, so any HAL delay provider
/// only needs to add `millis()`.
pub trait Clock: DelayNs {
    /// Milliseconds since boot. Wraps around after `u32::MAX`; callers compare
    /// timestamps with `wrapping_sub` only.
    fn millis(&mut self) -> u32;
}

/// Pin configuration and level access by pin number.
pub trait PinIo {
    /// Associated error type for pin access errors.
    type Error: Debug;

    /// Puts `pin` into `mode`. Called once per pin at the start of each read.
    fn configure_pin(&mut self, pin: Pin, mode: PinMode) -> Result<(), Self::Error>;

    /// Samples the current level of `pin`.
    fn read_pin(&mut self, pin: Pin) -> Result<PinState, Self::Error>;

    /// Drives `pin` to `state`.
    fn write_pin(&mut self, pin: Pin, state: PinState) -> Result<(), Self::Error>;
}

/// Abstraction for a (possibly software) UART that is opened per exchange.
pub trait SerialPort {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Opens the port on `pins` at `baud`, 8N1. Hardware UARTs with fixed
    /// pins may ignore `pins`.
    fn open(&mut self, pins: SerialPins, baud: u32) -> Result<(), Self::Error>;

    /// Releases the port. Must be safe to call on a port that failed to open.
    fn close(&mut self);

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// The firmware's periodic tick timer, shared with other subsystems.
pub trait PeriodicTimer {
    /// Stops the periodic interrupt.
    fn suspend(&mut self);

    /// Restarts the periodic interrupt.
    fn resume(&mut self);
}

/// Hook into the system-health instrumentation (stack/heap watermarks and the like).
pub trait Instrumentation {
    /// Called once at the end of every acquisition. Does nothing by default.
    fn gather_system_metrics(&mut self) {}
}

// Forwarding impls so drivers can borrow a board interface instead of owning it.

impl<T: Clock + ?Sized> Clock for &mut T {
    fn millis(&mut self) -> u32 {
        T::millis(self)
    }
}

impl<T: PinIo + ?Sized> PinIo for &mut T {
    type Error = T::Error;

    fn configure_pin(&mut self, pin: Pin, mode: PinMode) -> Result<(), Self::Error> {
        T::configure_pin(self, pin, mode)
    }

    fn read_pin(&mut self, pin: Pin) -> Result<PinState, Self::Error> {
        T::read_pin(self, pin)
    }

    fn write_pin(&mut self, pin: Pin, state: PinState) -> Result<(), Self::Error> {
        T::write_pin(self, pin, state)
    }
}

impl<T: SerialPort + ?Sized> SerialPort for &mut T {
    type Error = T::Error;

    fn open(&mut self, pins: SerialPins, baud: u32) -> Result<(), Self::Error> {
        T::open(self, pins, baud)
    }

    fn close(&mut self) {
        T::close(self)
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        T::read_byte(self)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        T::write_byte(self, byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        T::flush(self)
    }
}

impl<T: PeriodicTimer + ?Sized> PeriodicTimer for &mut T {
    fn suspend(&mut self) {
        T::suspend(self)
    }

    fn resume(&mut self) {
        T::resume(self)
    }
}

impl<T: Instrumentation + ?Sized> Instrumentation for &mut T {
    fn gather_system_metrics(&mut self) {
        T::gather_system_metrics(self)
    }
}
