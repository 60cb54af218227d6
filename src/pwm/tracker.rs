// src/pwm/tracker.rs

use crate::common::{error::SensorError, timing::MHZ_PWM_EDGE_MS};
use embedded_hal::digital::PinState;

/// Where the observation of one PWM period currently stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DutyStage {
    /// Waiting for the line to be low, so the next rising edge starts a period.
    WaitForLow,
    /// Line seen low; waiting for the rising edge.
    WaitForHigh,
    /// Timing the high phase.
    CountForHigh,
    /// Timing the low phase.
    CountForLow,
    /// Both phases timed.
    CycleFinished,
}

/// High and low phase durations of one PWM period, in milliseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PulseCycle {
    pub high_ms: u32,
    pub low_ms: u32,
}

impl PulseCycle {
    /// Maps the duty cycle onto `0..=range`.
    ///
    /// Each period starts with a fixed 2 ms high segment and ends with a
    /// fixed 2 ms low segment that carry no data:
    /// `range * (high - 2) / (high + low - 4)`.
    ///
    /// Returns `None` when the phases are too short for that correction.
    pub fn scale(&self, range: u16) -> Option<u32> {
        let data_high = self.high_ms.checked_sub(MHZ_PWM_EDGE_MS)?;
        let data_period = self
            .high_ms
            .checked_add(self.low_ms)?
            .checked_sub(2 * MHZ_PWM_EDGE_MS)
            .filter(|period| *period > 0)?;
        let value = u64::from(range) * u64::from(data_high) / u64::from(data_period);
        Some(u32::try_from(value).unwrap_or(u32::MAX))
    }

    /// Raw duty cycle in 1/1000, without edge correction. Zero-length periods
    /// report 0.
    pub fn duty_permille(&self) -> u32 {
        let period = u64::from(self.high_ms) + u64::from(self.low_ms);
        if period == 0 {
            return 0;
        }
        (u64::from(self.high_ms) * 1000 / period) as u32
    }
}

/// State machine timing one PWM period from `(level, timestamp)` samples.
///
/// It never leaves [`DutyStage::CycleFinished`] once there; a new tracker is
/// needed for the next measurement.
#[derive(Debug, Clone)]
pub struct DutyCycleTracker {
    stage: DutyStage,
    phase_started: u32,
    high_ms: u32,
    low_ms: u32,
}

impl DutyCycleTracker {
    pub const fn new() -> Self {
        DutyCycleTracker {
            stage: DutyStage::WaitForLow,
            phase_started: 0,
            high_ms: 0,
            low_ms: 0,
        }
    }

    #[inline]
    pub fn stage(&self) -> DutyStage {
        self.stage
    }

    /// Feeds one sample taken at `now` and returns the resulting stage.
    pub fn step(&mut self, level: PinState, now: u32) -> DutyStage {
        self.stage = match (self.stage, level) {
            (DutyStage::WaitForLow, PinState::Low) => DutyStage::WaitForHigh,
            (DutyStage::WaitForHigh, PinState::High) => {
                self.phase_started = now;
                DutyStage::CountForHigh
            }
            (DutyStage::CountForHigh, PinState::Low) => {
                self.high_ms = now.wrapping_sub(self.phase_started);
                self.phase_started = now;
                DutyStage::CountForLow
            }
            (DutyStage::CountForLow, PinState::High) => {
                self.low_ms = now.wrapping_sub(self.phase_started);
                DutyStage::CycleFinished
            }
            (stage, _) => stage,
        };
        self.stage
    }

    /// The measured period, or the failure matching the stage the tracker
    /// stopped in.
    pub fn finish<E>(&self) -> Result<PulseCycle, SensorError<E>>
    where
        E: core::fmt::Debug,
    {
        match self.stage {
            DutyStage::CycleFinished => Ok(PulseCycle { high_ms: self.high_ms, low_ms: self.low_ms }),
            DutyStage::WaitForLow => Err(SensorError::NoLowLevel),
            DutyStage::WaitForHigh => Err(SensorError::NoHighLevel),
            DutyStage::CountForHigh | DutyStage::CountForLow => Err(SensorError::Timeout),
        }
    }
}

impl Default for DutyCycleTracker {
    fn default() -> Self {
        Self::new()
    }
}
