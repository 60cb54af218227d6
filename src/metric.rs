// src/metric.rs

//! Metric read entry points called by the reporting layer.
//!
//! Each function performs exactly one acquisition (or none, during warm-up)
//! and flattens the outcome into a [`MetricResult`]. Nothing is retried and
//! nothing is remembered between calls.

use crate::common::{
    error::SensorError,
    hal_traits::{Clock, Instrumentation, PeriodicTimer, PinIo, SerialPort},
    pin::{BusPins, Pin, SerialPins},
    status::{MetricResult, StatusCode},
    timing::{Timings, WarmupDeadline, MHZ_PREHEAT_GAS_CONCENTRATION},
};
use crate::pwm::MhzPwm;
use crate::spi::max6675::Max6675;
use crate::uart::MhzUart;
use log::debug;

pub use crate::common::status::MetricKind;

/// Reads CO2 concentration (ppm) from an MH-Zxx over its UART.
///
/// Before `warmup` has passed the port is not touched and the nominal
/// warm-up concentration is reported instead. The health hook runs on every
/// path.
pub fn read_mhz_uart<IF>(interface: &mut IF, pins: SerialPins, warmup: WarmupDeadline, timings: &Timings) -> MetricResult
where
    IF: SerialPort + Clock + Instrumentation,
{
    let outcome = if warmup.is_warming_up(interface.millis()) {
        debug!("mh-zxx: warming up until {} ms", warmup.as_millis());
        Ok(MHZ_PREHEAT_GAS_CONCENTRATION)
    } else {
        MhzUart::open(&mut *interface, pins, timings).and_then(|mut sensor| sensor.read_gas_concentration())
    };

    interface.gather_system_metrics();
    MetricResult::from_outcome(outcome.map(i32::from), StatusCode::UnsignedValue)
}

/// Reads CO2 concentration (ppm) from the PWM output of an MH-Zxx set to
/// `range` ppm.
///
/// `timer` is suspended while the pin is polled and resumed before the
/// health hook runs. During warm-up neither the pin nor the timer is
/// touched, and the health hook is skipped.
pub fn read_mhz_pwm<IF, T>(
    interface: &mut IF,
    timer: &mut T,
    pin: Pin,
    range: u16,
    warmup: WarmupDeadline,
    timings: &Timings,
) -> MetricResult
where
    IF: PinIo + Clock + Instrumentation,
    T: PeriodicTimer,
{
    if warmup.is_warming_up(interface.millis()) {
        debug!("mh-zxx(pwm): warming up until {} ms", warmup.as_millis());
        return MetricResult::success(StatusCode::UnsignedValue, i32::from(MHZ_PREHEAT_GAS_CONCENTRATION));
    }

    let outcome = MhzPwm::new(&mut *interface, pin, range, timings)
        .read_concentration(timer)
        .map(|ppm| i32::try_from(ppm).unwrap_or(i32::MAX));

    interface.gather_system_metrics();
    MetricResult::from_outcome(outcome, StatusCode::UnsignedValue)
}

/// Reads a MAX6675 thermocouple converter.
///
/// On success the value is in hundredths of a degree Celsius and the status
/// is [`StatusCode::Float02Digit`]. The select line is released and the
/// health hook runs on every path.
pub fn read_max6675<IF>(interface: &mut IF, pins: BusPins, metric: MetricKind, timings: &Timings) -> MetricResult
where
    IF: PinIo + Clock + Instrumentation,
{
    let outcome: Result<i32, SensorError<IF::Error>> = Max6675::new(&mut *interface, pins, timings).read(metric);

    interface.gather_system_metrics();
    MetricResult::from_outcome(outcome, StatusCode::Float02Digit)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::mock::{response, MockBoard, MockTimer};
    use embedded_hal::digital::PinState::{High, Low};

    const UART_PINS: SerialPins = SerialPins::new(Pin::new(8), Pin::new(9));
    const PWM_PIN: Pin = Pin::new(7);
    const BUS_PINS: BusPins = BusPins::new(Pin::new(2), Pin::new(3), Pin::new(4));
    const WARMUP: WarmupDeadline = WarmupDeadline::at(180_000);

    #[test]
    fn test_uart_end_to_end() {
        let mut board = MockBoard::at(200_000).with_response(&response(0x01, 0x2C));
        let result = read_mhz_uart(&mut board, UART_PINS, WARMUP, &Timings::default());
        assert_eq!(result.status(), StatusCode::UnsignedValue);
        assert_eq!(result.value(), Some(300));
        assert_eq!(board.health_calls, 1);
        assert!(!board.serial_open);
    }

    #[test]
    fn test_uart_failures_carry_no_value() {
        let mut wrong_start = response(0x01, 0x2C);
        wrong_start[0] = 0x00;
        let mut board = MockBoard::at(200_000).with_response(&wrong_start);
        let result = read_mhz_uart(&mut board, UART_PINS, WARMUP, &Timings::default());
        assert_eq!(result.status(), StatusCode::WrongAnswer);
        assert_eq!(result.value(), None);
        assert_eq!(board.health_calls, 1);

        let mut corrupted = response(0x01, 0x2C);
        corrupted[3] ^= 0x80;
        let mut board = MockBoard::at(200_000).with_response(&corrupted);
        let result = read_mhz_uart(&mut board, UART_PINS, WARMUP, &Timings::default());
        assert_eq!(result.status(), StatusCode::Checksum);
        assert_eq!(result.value(), None);

        let mut board = MockBoard::at(200_000);
        let result = read_mhz_uart(&mut board, UART_PINS, WARMUP, &Timings::default());
        assert_eq!(result.status(), StatusCode::Timeout);
        assert_eq!(board.health_calls, 1);
        assert_eq!(board.closes, 1);
    }

    #[test]
    fn test_uart_preheat_bypass() {
        let mut board = MockBoard::at(1_000).with_response(&response(0x01, 0x2C));
        let result = read_mhz_uart(&mut board, UART_PINS, WARMUP, &Timings::default());
        assert_eq!(result.status(), StatusCode::UnsignedValue);
        assert_eq!(result.value(), Some(i32::from(MHZ_PREHEAT_GAS_CONCENTRATION)));
        assert_eq!(board.serial_accesses, 0);
        assert_eq!(board.health_calls, 1);
    }

    #[test]
    fn test_pwm_end_to_end() {
        let mut board = MockBoard::at(200_000).with_waveform(
            PWM_PIN,
            Low,
            &[(200_010, High), (200_060, Low), (200_090, High)],
        );
        let mut timer = MockTimer::new();
        let result = read_mhz_pwm(&mut board, &mut timer, PWM_PIN, 5000, WARMUP, &Timings::default());
        assert_eq!(result.status(), StatusCode::UnsignedValue);
        assert_eq!(result.value(), Some(5000 * 48 / 76));
        assert_eq!(board.health_calls, 1);
        assert!(timer.running);
    }

    #[test]
    fn test_pwm_no_low_level() {
        let mut board = MockBoard::at(200_000).with_waveform(PWM_PIN, High, &[]);
        let mut timer = MockTimer::new();
        let result = read_mhz_pwm(&mut board, &mut timer, PWM_PIN, 5000, WARMUP, &Timings::default());
        assert_eq!(result.status(), StatusCode::AckL);
        assert_eq!(result.value(), None);
        assert_eq!((timer.suspends, timer.resumes), (1, 1));
        assert_eq!(board.health_calls, 1);
    }

    #[test]
    fn test_pwm_no_high_level() {
        let mut board = MockBoard::at(200_000).with_waveform(PWM_PIN, Low, &[]);
        let mut timer = MockTimer::new();
        let result = read_mhz_pwm(&mut board, &mut timer, PWM_PIN, 5000, WARMUP, &Timings::default());
        assert_eq!(result.status(), StatusCode::AckH);
        assert!(timer.running);
    }

    #[test]
    fn test_pwm_preheat_bypass() {
        let mut board = MockBoard::at(1_000).with_waveform(PWM_PIN, Low, &[]);
        let mut timer = MockTimer::new();
        let result = read_mhz_pwm(&mut board, &mut timer, PWM_PIN, 5000, WARMUP, &Timings::default());
        assert_eq!(result.value(), Some(i32::from(MHZ_PREHEAT_GAS_CONCENTRATION)));
        assert!(result.is_success());
        assert_eq!(board.pin_accesses, 0);
        assert_eq!(timer.suspends, 0);
    }

    #[test]
    fn test_max6675_end_to_end() {
        let mut board = MockBoard::new().with_converter(BUS_PINS, 0x0C80);
        let result = read_max6675(&mut board, BUS_PINS, MetricKind::Temperature, &Timings::default());
        assert_eq!(result.status(), StatusCode::Float02Digit);
        assert_eq!(result.value(), Some(10_000));
        assert_eq!(result.status().decimal_digits(), Some(2));
        assert_eq!(board.health_calls, 1);
    }

    #[test]
    fn test_max6675_reads_during_boot() {
        let mut board = MockBoard::at(1_000).with_converter(BUS_PINS, 0x0C80);
        let result = read_max6675(&mut board, BUS_PINS, MetricKind::Temperature, &Timings::default());
        assert_eq!(result.value(), Some(10_000));
        assert!(board.pin_accesses > 0);
    }

    #[test]
    fn test_max6675_failures() {
        let cases = [
            (0x8C80, StatusCode::WrongId),
            (0x0C84, StatusCode::Connect),
        ];
        for (register, expected) in cases {
            let mut board = MockBoard::new().with_converter(BUS_PINS, register);
            let result = read_max6675(&mut board, BUS_PINS, MetricKind::Temperature, &Timings::default());
            assert_eq!(result.status(), expected, "register {:#06x}", register);
            assert_eq!(result.value(), None);
            assert_eq!(board.output(BUS_PINS.select), High);
            assert_eq!(board.health_calls, 1);
        }
    }

    #[test]
    fn test_max6675_unsupported_metric() {
        let mut board = MockBoard::new().with_converter(BUS_PINS, 0x0C80);
        let result = read_max6675(&mut board, BUS_PINS, MetricKind::Pressure, &Timings::default());
        assert_eq!(result.status(), StatusCode::Fail);
        assert_eq!(board.pin_accesses, 0);
        assert_eq!(board.health_calls, 1);
    }
}
