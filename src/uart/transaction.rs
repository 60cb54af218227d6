// src/uart/transaction.rs

use super::MhzUart;
use crate::common::{
    command::Command,
    error::SensorError,
    frame::Frame,
    hal_traits::{Clock, SerialPort},
};

impl<IF> MhzUart<IF>
where
    IF: SerialPort + Clock,
{
    /// Executes one request/response exchange. Single attempt: the caller
    /// owns any retry policy.
    pub(super) fn execute_transaction(&mut self, command: &Command) -> Result<Frame, SensorError<IF::Error>> {
        // 1. Drop anything left over from an earlier exchange
        self.drain_rx()?;

        // 2. Send the request
        self.send_frame(&command.to_frame())?;

        // 3. Collect the response
        self.receive_frame()
    }
}
