// src/common/timing.rs

// Nominal values from the Winsen MH-Z19B and Maxim MAX6675 datasheets.
// All timestamps are milliseconds of a free-running u32 clock.

// === MH-Zxx serial ===

/// MH-Zxx UART speed (8N1).
pub const MHZ_UART_BAUD: u32 = 9600;
/// Time allowed for a full 9-byte response, counted from the end of the request.
/// A frame takes ~9.4 ms on the wire; the sensor may answer late while measuring.
pub const MHZ_READ_TIMEOUT_MS: u32 = 1000;

// === MH-Zxx warm-up ===

/// Sensors need three minutes after power-on before readings are valid.
pub const MHZ_PREHEAT_TIMEOUT_MS: u32 = 180_000;
/// Concentration reported while the sensor is still warming up.
pub const MHZ_PREHEAT_GAS_CONCENTRATION: u16 = 400;

// === MH-Zxx PWM output ===

/// A PWM period is 1004 ms: 2 ms start high, 1000 ms data, 2 ms end low.
pub const MHZ_PWM_PERIOD_MS: u32 = 1004;
/// Fixed high (and low) edge segment removed from each phase before scaling.
pub const MHZ_PWM_EDGE_MS: u32 = 2;
/// Budget for one observation: worst case is waiting almost a full period
/// for the first low level, another for the rising edge, then one period.
pub const MHZ_PWM_CYCLE_BUDGET_MS: u32 = 3 * MHZ_PWM_PERIOD_MS + 100;

// === MAX6675 ===

/// Conversion time after the select line is released (typ. 170 ms, max 220 ms).
pub const MAX6675_CONVERSION_TIME_MS: u32 = 220;
/// Select line low time used to abort a running conversion.
pub const MAX6675_RESTART_PULSE_MS: u32 = 1;
/// Settle time between asserting select and the first clock edge.
pub const MAX6675_SELECT_SETUP_MS: u32 = 1;
/// Half clock period for the bit-banged bus. The MAX6675 accepts up to 4.3 MHz.
pub const BUS_HALF_PERIOD_US: u32 = 1;

/// Run-time overridable timing parameters.
///
/// `Timings::default()` uses the datasheet constants above.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timings {
    pub uart_baud: u32,
    pub uart_read_timeout_ms: u32,
    pub pwm_cycle_budget_ms: u32,
    pub max6675_conversion_ms: u32,
    pub bus_half_period_us: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            uart_baud: MHZ_UART_BAUD,
            uart_read_timeout_ms: MHZ_READ_TIMEOUT_MS,
            pwm_cycle_budget_ms: MHZ_PWM_CYCLE_BUDGET_MS,
            max6675_conversion_ms: MAX6675_CONVERSION_TIME_MS,
            bus_half_period_us: BUS_HALF_PERIOD_US,
        }
    }
}

/// Uptime before which a sensor is still warming up.
///
/// One deadline is shared by every acquisition method that talks to the same
/// physical sensor. The comparison is against absolute uptime, so a board
/// running past the `u32` millisecond wrap (~49.7 days) sees a second
/// warm-up window of the same length.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WarmupDeadline(u32);

impl WarmupDeadline {
    /// A deadline `ms` milliseconds after boot.
    pub const fn at(ms: u32) -> Self {
        WarmupDeadline(ms)
    }

    /// A deadline that has always passed.
    pub const fn none() -> Self {
        WarmupDeadline(0)
    }

    pub const fn as_millis(&self) -> u32 {
        self.0
    }

    /// True while `now` has not moved past the deadline.
    #[inline]
    pub const fn is_warming_up(&self, now: u32) -> bool {
        now <= self.0
    }
}

impl Default for WarmupDeadline {
    fn default() -> Self {
        WarmupDeadline(MHZ_PREHEAT_TIMEOUT_MS)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warmup_boundary() {
        let deadline = WarmupDeadline::at(1000);
        assert!(deadline.is_warming_up(0));
        assert!(deadline.is_warming_up(1000));
        assert!(!deadline.is_warming_up(1001));
    }

    #[test]
    fn test_no_deadline() {
        assert!(!WarmupDeadline::none().is_warming_up(1));
    }

    #[test]
    fn test_defaults() {
        let timings = Timings::default();
        assert_eq!(timings.uart_baud, 9600);
        assert!(timings.pwm_cycle_budget_ms > 2 * MHZ_PWM_PERIOD_MS);
        assert_eq!(WarmupDeadline::default().as_millis(), 180_000);
    }
}
