//! Six-digit multiplexed display: the digit buffer derived from the clock and
//! the scheduler that scans it onto the hardware one position at a time.

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::clock::TimeState;
use crate::config::StopwatchConfig;

/// Number of digit positions.
pub const DIGITS: usize = 6;

/// Number of lines into the BCD-to-7-segment decoder.
pub const BCD_LINES: usize = 4;

/// Decimal digits of a [`TimeState`], most significant first:
/// `[HR_tens, HR_units, MIN_tens, MIN_units, SEC_tens, SEC_units]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayBuffer([u8; DIGITS]);

impl DisplayBuffer {
    pub const HR_TENS: usize = 0;
    pub const HR_UNITS: usize = 1;
    pub const MIN_TENS: usize = 2;
    pub const MIN_UNITS: usize = 3;
    pub const SEC_TENS: usize = 4;
    pub const SEC_UNITS: usize = 5;

    pub const ZERO: Self = Self([0; DIGITS]);

    pub const fn from_time(time: &TimeState) -> Self {
        Self([
            time.hours() / 10,
            time.hours() % 10,
            time.minutes() / 10,
            time.minutes() % 10,
            time.seconds() / 10,
            time.seconds() % 10,
        ])
    }

    pub const fn digits(&self) -> [u8; DIGITS] {
        self.0
    }

    /// Panics if `position >= DIGITS`.
    pub const fn digit(&self, position: usize) -> u8 {
        self.0[position]
    }

    /// Recombines the digits into a time, or `None` if they do not form one.
    pub fn to_time(&self) -> Option<TimeState> {
        if self.0.iter().any(|&d| d > 9) {
            return None;
        }
        let [h1, h0, m1, m0, s1, s0] = self.0;
        TimeState::new(h1 * 10 + h0, m1 * 10 + m0, s1 * 10 + s0)
    }
}

impl From<TimeState> for DisplayBuffer {
    fn from(time: TimeState) -> Self {
        Self::from_time(&time)
    }
}

/// Which buffer digit each enable line shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanOrder {
    /// Enable line `i` shows digit `i` (hours tens on line 0).
    Forward,
    /// Enable line `i` shows digit `5 - i` (seconds units on line 0).
    #[default]
    Reversed,
}

impl ScanOrder {
    pub const fn digit_for_line(self, line: usize) -> usize {
        match self {
            ScanOrder::Forward => line,
            ScanOrder::Reversed => DIGITS - 1 - line,
        }
    }
}

/// Output side of a multiplexed display.
///
/// Lines are `0..DIGITS`. The digit lines are shared by every position, so
/// only one position may be active at a time; [`RefreshScheduler`] keeps to
/// that, the sink does not check it.
pub trait DigitSink {
    fn activate(&mut self, line: usize);

    fn deactivate(&mut self, line: usize);

    /// `digit` is always `0..=9`.
    fn write_digit(&mut self, digit: u8);
}

/// Six active-high enable pins (one transistor per display) and four BCD
/// pins into a 7447-style decoder, least significant bit first.
pub struct MultiplexedBcd<E, B> {
    enables: [E; DIGITS],
    bcd: [B; BCD_LINES],
}

impl<E, B> MultiplexedBcd<E, B>
where
    E: OutputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
{
    /// Takes the pins and drives them all low.
    pub fn new(enables: [E; DIGITS], bcd: [B; BCD_LINES]) -> Self {
        let mut sink = Self { enables, bcd };
        for pin in sink.enables.iter_mut() {
            pin.set_low().unwrap_or_else(|e| match e {});
        }
        for pin in sink.bcd.iter_mut() {
            pin.set_low().unwrap_or_else(|e| match e {});
        }
        sink
    }

    pub fn release(self) -> ([E; DIGITS], [B; BCD_LINES]) {
        (self.enables, self.bcd)
    }
}

impl<E, B> DigitSink for MultiplexedBcd<E, B>
where
    E: OutputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
{
    fn activate(&mut self, line: usize) {
        self.enables[line].set_high().unwrap_or_else(|e| match e {});
    }

    fn deactivate(&mut self, line: usize) {
        self.enables[line].set_low().unwrap_or_else(|e| match e {});
    }

    fn write_digit(&mut self, digit: u8) {
        debug_assert!(digit <= 9, "digit out of range: {}", digit);
        for (bit, pin) in self.bcd.iter_mut().enumerate() {
            let res = if (digit >> bit) & 1 == 1 {
                pin.set_high()
            } else {
                pin.set_low()
            };
            res.unwrap_or_else(|e| match e {});
        }
    }
}

/// Scans a [`DisplayBuffer`] onto a [`DigitSink`], one line at a time.
pub struct RefreshScheduler<S, D> {
    sink: S,
    delay: D,
    order: ScanOrder,
    hold_ms: u32,
}

impl<S, D> RefreshScheduler<S, D>
where
    S: DigitSink,
    D: DelayMs<u32>,
{
    pub fn new(sink: S, delay: D, order: ScanOrder, hold_ms: u32) -> Self {
        Self {
            sink,
            delay,
            order,
            hold_ms,
        }
    }

    pub fn from_config(sink: S, delay: D, config: &StopwatchConfig) -> Self {
        Self::new(sink, delay, config.scan_order, config.digit_hold_ms)
    }

    /// Shows every position once, each for the hold duration.
    pub fn scan_cycle(&mut self, buffer: &DisplayBuffer) {
        for line in 0..DIGITS {
            let digit = buffer.digit(self.order.digit_for_line(line));
            self.sink.activate(line);
            self.sink.write_digit(digit);
            self.delay.delay_ms(self.hold_ms);
            self.sink.deactivate(line);
        }
    }

    /// Scans forever. `source` is sampled once per cycle and the whole
    /// cycle renders that one snapshot.
    pub fn run<F>(&mut self, mut source: F) -> !
    where
        F: FnMut() -> DisplayBuffer,
    {
        info!("display refresh running, hold {=u32} ms", self.hold_ms);
        loop {
            let buffer = source();
            self.scan_cycle(&buffer);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
