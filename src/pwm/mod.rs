// src/pwm/mod.rs

//! MH-Zxx CO2 concentration from the sensor's PWM output.
//!
//! The duty cycle is timed by polling the pin against the millisecond clock,
//! without a capture timer. The firmware's periodic timer interrupt would
//! skew the samples, so it is suspended for the duration of the observation.

mod tracker;

pub use tracker::{DutyCycleTracker, DutyStage, PulseCycle};

use crate::common::{
    error::SensorError,
    hal_traits::{Clock, PeriodicTimer, PinIo},
    pin::{Pin, PinMode},
    timing::Timings,
};
use log::debug;

/// Suspends a periodic timer for as long as it lives.
pub struct TimerPause<'a, T>
where
    T: PeriodicTimer,
{
    timer: &'a mut T,
}

impl<'a, T> TimerPause<'a, T>
where
    T: PeriodicTimer,
{
    pub fn new(timer: &'a mut T) -> Self {
        timer.suspend();
        TimerPause { timer }
    }
}

impl<T> Drop for TimerPause<'_, T>
where
    T: PeriodicTimer,
{
    fn drop(&mut self) {
        self.timer.resume();
    }
}

/// An MH-Zxx whose PWM output is wired to `pin`.
#[derive(Debug)]
pub struct MhzPwm<IF>
where
    IF: PinIo + Clock,
{
    interface: IF,
    pin: Pin,
    range: u16,
    budget_ms: u32,
}

impl<IF> MhzPwm<IF>
where
    IF: PinIo + Clock,
{
    /// `range` is the detection range the sensor is set to (2000, 5000 or
    /// 10000 ppm).
    pub fn new(interface: IF, pin: Pin, range: u16, timings: &Timings) -> Self {
        MhzPwm {
            interface,
            pin,
            range,
            budget_ms: timings.pwm_cycle_budget_ms,
        }
    }

    /// Times one full PWM period with `timer` suspended.
    ///
    /// The timer is resumed before this returns, on every path.
    pub fn measure<T: PeriodicTimer>(&mut self, timer: &mut T) -> Result<PulseCycle, SensorError<IF::Error>> {
        self.interface
            .configure_pin(self.pin, PinMode::InputPullUp)
            .map_err(SensorError::Io)?;

        let _paused = TimerPause::new(timer);
        self.observe_cycle()
    }

    /// Measures one period and scales it to ppm.
    pub fn read_concentration<T: PeriodicTimer>(&mut self, timer: &mut T) -> Result<u32, SensorError<IF::Error>> {
        let cycle = self.measure(timer).inspect_err(|e| debug!("mh-zxx(pwm): {} on {}", e, self.pin))?;
        debug!("mh-zxx(pwm): high {} ms, low {} ms", cycle.high_ms, cycle.low_ms);

        cycle.scale(self.range).ok_or(SensorError::DegenerateCycle {
            high_ms: cycle.high_ms,
            low_ms: cycle.low_ms,
        })
    }

    // No logging in here: the loop's timing is the measurement.
    fn observe_cycle(&mut self) -> Result<PulseCycle, SensorError<IF::Error>> {
        let mut tracker = DutyCycleTracker::new();
        let started = self.interface.millis();

        loop {
            let now = self.interface.millis();
            let level = self.interface.read_pin(self.pin).map_err(SensorError::Io)?;

            if tracker.step(level, now) == DutyStage::CycleFinished {
                break;
            }
            if now.wrapping_sub(started) >= self.budget_ms {
                break;
            }
        }

        tracker.finish()
    }
}
