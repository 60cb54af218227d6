// src/common/mock.rs

//! Scripted board used by the unit tests.
//!
//! Time only moves when the code under test asks for it: every `millis()`
//! call advances the clock by `tick_us` and every delay by its length. Pin
//! levels are computed from the current time, so a PWM waveform is scripted
//! as a list of edges.

use super::checksum::checksum;
use super::frame::{Frame, CHECKSUM_BYTE};
use super::hal_traits::{Clock, Instrumentation, PeriodicTimer, PinIo, SerialPort};
use super::pin::{BusPins, Pin, PinMode, SerialPins};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use heapless::{Deque, Vec};

const PIN_COUNT: usize = 32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockIoError;

/// A well-formed gas concentration response with `high` and `low` as the
/// ppm bytes.
pub fn response(high: u8, low: u8) -> Frame {
    let mut frame = [0xFF, 0x86, high, low, 0x47, 0x00, 0x00, 0x00, 0x00];
    frame[CHECKSUM_BYTE] = checksum(&frame[1..CHECKSUM_BYTE]);
    frame
}

/// MAX6675-like shift register behind three pins.
pub struct MockConverter {
    pub pins: BusPins,
    pub register: u16,
    bit: u8,
}

/// Waveform on one input pin: `initial` level, then `(time_ms, level)` edges.
pub struct MockWaveform {
    pub pin: Pin,
    pub initial: PinState,
    pub edges: Vec<(u32, PinState), 8>,
}

pub struct MockBoard {
    now_us: u64,
    pub tick_us: u64,
    pub modes: [Option<PinMode>; PIN_COUNT],
    pub outputs: [PinState; PIN_COUNT],
    pub pin_accesses: u32,
    pub fail_pin_reads: bool,
    pub converter: Option<MockConverter>,
    pub waveform: Option<MockWaveform>,
    pub serial_open: bool,
    pub opened_baud: Option<u32>,
    pub opened_pins: Option<SerialPins>,
    pub opens: u32,
    pub closes: u32,
    pub fail_open: bool,
    pub rx: Deque<u8, 64>,
    pub response: Vec<u8, 16>,
    pub written: Vec<u8, 32>,
    pub serial_accesses: u32,
    pub health_calls: u32,
}

impl MockBoard {
    pub fn new() -> Self {
        MockBoard {
            now_us: 0,
            tick_us: 1000,
            modes: [None; PIN_COUNT],
            outputs: [PinState::High; PIN_COUNT],
            pin_accesses: 0,
            fail_pin_reads: false,
            converter: None,
            waveform: None,
            serial_open: false,
            opened_baud: None,
            opened_pins: None,
            opens: 0,
            closes: 0,
            fail_open: false,
            rx: Deque::new(),
            response: Vec::new(),
            written: Vec::new(),
            serial_accesses: 0,
            health_calls: 0,
        }
    }

    /// Board whose clock already reads `ms`.
    pub fn at(ms: u32) -> Self {
        let mut board = Self::new();
        board.now_us = u64::from(ms) * 1000;
        board
    }

    pub fn with_converter(mut self, pins: BusPins, register: u16) -> Self {
        self.converter = Some(MockConverter { pins, register, bit: 0 });
        self
    }

    pub fn with_waveform(mut self, pin: Pin, initial: PinState, edges: &[(u32, PinState)]) -> Self {
        let mut scripted = Vec::new();
        for edge in edges {
            scripted.push(*edge).unwrap();
        }
        self.waveform = Some(MockWaveform { pin, initial, edges: scripted });
        self
    }

    /// Bytes already sitting in the receive buffer before the exchange starts.
    pub fn with_stale_rx(mut self, bytes: &[u8]) -> Self {
        for byte in bytes {
            self.rx.push_back(*byte).unwrap();
        }
        self
    }

    /// Bytes the device sends once the request has been flushed.
    pub fn with_response(mut self, bytes: &[u8]) -> Self {
        self.response = Vec::from_slice(bytes).unwrap();
        self
    }

    pub fn now_ms(&self) -> u32 {
        (self.now_us / 1000) as u32
    }

    pub fn output(&self, pin: Pin) -> PinState {
        self.outputs[pin.number() as usize]
    }

    fn level_at(waveform: &MockWaveform, now_ms: u32) -> PinState {
        waveform
            .edges
            .iter()
            .filter(|(at, _)| *at <= now_ms)
            .last()
            .map(|(_, level)| *level)
            .unwrap_or(waveform.initial)
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.now_us += u64::from(ns).div_ceil(1000);
    }
}

impl Clock for MockBoard {
    fn millis(&mut self) -> u32 {
        self.now_us += self.tick_us;
        self.now_ms()
    }
}

impl PinIo for MockBoard {
    type Error = MockIoError;

    fn configure_pin(&mut self, pin: Pin, mode: PinMode) -> Result<(), Self::Error> {
        self.pin_accesses += 1;
        self.modes[pin.number() as usize] = Some(mode);
        Ok(())
    }

    fn read_pin(&mut self, pin: Pin) -> Result<PinState, Self::Error> {
        self.pin_accesses += 1;
        if self.fail_pin_reads {
            return Err(MockIoError);
        }
        let now_ms = self.now_ms();
        if let Some(waveform) = &self.waveform {
            if waveform.pin == pin {
                return Ok(Self::level_at(waveform, now_ms));
            }
        }
        if let Some(converter) = &self.converter {
            if converter.pins.data == pin && self.outputs[converter.pins.select.number() as usize] == PinState::Low {
                let bit = converter.bit.min(15);
                let level = (converter.register >> (15 - bit)) & 1;
                return Ok(PinState::from(level == 1));
            }
        }
        Ok(PinState::Low)
    }

    fn write_pin(&mut self, pin: Pin, state: PinState) -> Result<(), Self::Error> {
        self.pin_accesses += 1;
        self.outputs[pin.number() as usize] = state;
        if let Some(converter) = &mut self.converter {
            if pin == converter.pins.select && state == PinState::Low {
                converter.bit = 0;
            }
            if pin == converter.pins.clock && state == PinState::High {
                converter.bit = converter.bit.saturating_add(1);
            }
        }
        Ok(())
    }
}

impl SerialPort for MockBoard {
    type Error = MockIoError;

    fn open(&mut self, pins: SerialPins, baud: u32) -> Result<(), Self::Error> {
        self.serial_accesses += 1;
        self.opens += 1;
        if self.fail_open {
            return Err(MockIoError);
        }
        self.serial_open = true;
        self.opened_baud = Some(baud);
        self.opened_pins = Some(pins);
        Ok(())
    }

    fn close(&mut self) {
        self.closes += 1;
        self.serial_open = false;
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.serial_accesses += 1;
        assert!(self.serial_open, "read from a closed port");
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.serial_accesses += 1;
        assert!(self.serial_open, "write to a closed port");
        self.written.push(byte).map_err(|_| nb::Error::Other(MockIoError))
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.serial_accesses += 1;
        for byte in self.response.iter() {
            self.rx.push_back(*byte).map_err(|_| nb::Error::Other(MockIoError))?;
        }
        self.response.clear();
        Ok(())
    }
}

impl Instrumentation for MockBoard {
    fn gather_system_metrics(&mut self) {
        self.health_calls += 1;
    }
}

/// Periodic timer that records its state.
#[derive(Debug)]
pub struct MockTimer {
    pub running: bool,
    pub suspends: u32,
    pub resumes: u32,
}

impl MockTimer {
    pub fn new() -> Self {
        MockTimer { running: true, suspends: 0, resumes: 0 }
    }
}

impl PeriodicTimer for MockTimer {
    fn suspend(&mut self) {
        self.suspends += 1;
        self.running = false;
    }

    fn resume(&mut self) {
        self.resumes += 1;
        self.running = true;
    }
}
