// src/uart/mod.rs

//! Winsen MH-Zxx CO2 sensor over a serial line.
//!
//! One exchange is: open the port, drain stale input, send a 9-byte request,
//! collect a 9-byte response, close the port. The port is closed when the
//! [`MhzUart`] is dropped, whichever way the exchange ended.

mod io_helpers;
mod transaction;

use crate::common::{
    command::Command,
    error::SensorError,
    frame,
    hal_traits::{Clock, SerialPort},
    pin::SerialPins,
    timing::Timings,
};
use log::debug;

/// An open serial session with an MH-Zxx sensor.
#[derive(Debug)]
pub struct MhzUart<IF>
where
    IF: SerialPort + Clock,
{
    interface: IF,
    timings: Timings,
}

impl<IF> MhzUart<IF>
where
    IF: SerialPort + Clock,
{
    /// Opens the port on `pins` at `timings.uart_baud`.
    ///
    /// If the port cannot be opened it is still closed before returning, so
    /// the interface is left in a known state.
    pub fn open(mut interface: IF, pins: SerialPins, timings: &Timings) -> Result<Self, SensorError<IF::Error>> {
        if let Err(e) = interface.open(pins, timings.uart_baud) {
            debug!("mh-zxx: cannot open serial port at {} baud: {:?}", timings.uart_baud, e);
            interface.close();
            return Err(SensorError::Io(e));
        }
        Ok(MhzUart { interface, timings: *timings })
    }

    /// Reads the CO2 concentration in ppm.
    pub fn read_gas_concentration(&mut self) -> Result<u16, SensorError<IF::Error>> {
        let response = self.execute_transaction(&Command::ReadGasConcentration)?;
        let ppm = frame::decode_concentration(&response).inspect_err(|e| {
            debug!("mh-zxx: rejected response {:02x?}: {}", response, e);
        })?;
        debug!("mh-zxx: {} ppm", ppm);
        Ok(ppm)
    }

    /// Sends a command that has no response (calibration, range, ABC).
    pub fn send_command(&mut self, command: &Command) -> Result<(), SensorError<IF::Error>> {
        self.drain_rx()?;
        self.send_frame(&command.to_frame())
    }
}

impl<IF> Drop for MhzUart<IF>
where
    IF: SerialPort + Clock,
{
    fn drop(&mut self) {
        self.interface.close();
    }
}
