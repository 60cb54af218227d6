// src/uart/io_helpers.rs

use super::MhzUart;
use crate::common::{
    error::SensorError,
    frame::{Frame, FRAME_SIZE},
    hal_traits::{Clock, SerialPort},
};
use arrayvec::ArrayVec;
use log::{debug, trace};
use nb::Result as NbResult;

// Implementation block for I/O related helpers
impl<IF> MhzUart<IF>
where
    IF: SerialPort + Clock,
{
    /// Executes a non-blocking I/O operation (`f`) repeatedly until it stops
    /// returning `WouldBlock`, or until `timeout_ms` have passed since `started`.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        started: u32,
        timeout_ms: u32,
        mut f: FN,
    ) -> Result<T, SensorError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.millis().wrapping_sub(started) >= timeout_ms {
                        return Err(SensorError::Timeout);
                    }
                }
                Err(nb::Error::Other(e)) => return Err(SensorError::Io(e)),
            }
        }
    }

    /// Throws away whatever is already in the receive buffer.
    ///
    /// A previous exchange that timed out half way can leave the tail of a
    /// frame behind; reading it as the start of the next response would
    /// desynchronise the stream. Bounded by the read timeout in case the
    /// line is streaming garbage.
    pub(super) fn drain_rx(&mut self) -> Result<usize, SensorError<IF::Error>> {
        let started = self.interface.millis();
        let mut discarded = 0;
        loop {
            match self.interface.read_byte() {
                Ok(_) => {
                    discarded += 1;
                    if self.interface.millis().wrapping_sub(started) >= self.timings.uart_read_timeout_ms {
                        break;
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(SensorError::Io(e)),
            }
        }
        if discarded > 0 {
            debug!("mh-zxx: discarded {} stale bytes", discarded);
        }
        Ok(discarded)
    }

    /// Writes a whole frame and waits for the transmitter to drain.
    pub(super) fn send_frame(&mut self, frame: &Frame) -> Result<(), SensorError<IF::Error>> {
        trace!("mh-zxx: tx {:02x?}", frame);
        let started = self.interface.millis();
        let timeout_ms = self.timings.uart_read_timeout_ms;

        for byte in frame {
            self.execute_blocking_io_with_timeout(started, timeout_ms, |iface| iface.write_byte(*byte))?;
        }
        self.execute_blocking_io_with_timeout(started, timeout_ms, |iface| iface.flush())
    }

    /// Collects exactly one frame. The timeout covers the whole frame, not
    /// each byte.
    pub(super) fn receive_frame(&mut self) -> Result<Frame, SensorError<IF::Error>> {
        let started = self.interface.millis();
        let timeout_ms = self.timings.uart_read_timeout_ms;
        let mut received: ArrayVec<u8, FRAME_SIZE> = ArrayVec::new();

        while !received.is_full() {
            match self.execute_blocking_io_with_timeout(started, timeout_ms, |iface| iface.read_byte()) {
                Ok(byte) => received.push(byte),
                Err(SensorError::Timeout) => {
                    debug!("mh-zxx: timeout after {} of {} bytes", received.len(), FRAME_SIZE);
                    return Err(SensorError::Timeout);
                }
                Err(e) => return Err(e),
            }
        }

        let frame = received.into_inner().map_err(|_| SensorError::Timeout)?;
        trace!("mh-zxx: rx {:02x?}", frame);
        Ok(frame)
    }
}
