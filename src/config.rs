//! Compile-time configuration of timing, wiring and callback bindings.

use crate::display::ScanOrder;
use crate::error::ConfigError;
use crate::registry::{Command, EventLine, EVENT_LINES};

/// Transition an event line fires on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    LowLevel,
    AnyChange,
    Falling,
    Rising,
}

/// Bias on an event line's input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Internal pull-up enabled.
    Up,
    /// No internal bias; the board provides an external resistor.
    External,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineConfig {
    pub edge: Edge,
    pub pull: Pull,
}

impl LineConfig {
    pub const fn new(edge: Edge, pull: Pull) -> Self {
        Self { edge, pull }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StopwatchConfig {
    /// Period of the tick source.
    pub tick_period_us: u32,
    /// How long each digit stays lit per scan.
    pub digit_hold_ms: u32,
    pub scan_order: ScanOrder,
    /// Input policy per event line, indexed by [`EventLine::index`].
    pub lines: [LineConfig; EVENT_LINES],
    /// Which control action each event line triggers.
    pub bindings: [(EventLine, Command); EVENT_LINES],
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl StopwatchConfig {
    /// One-second ticks, 4 ms per digit; reset on A (falling, pull-up),
    /// pause on B (rising, external pull-down), resume on C (falling, pull-up).
    pub const DEFAULT: Self = Self {
        tick_period_us: 1_000_000,
        digit_hold_ms: 4,
        scan_order: ScanOrder::Reversed,
        lines: [
            LineConfig::new(Edge::Falling, Pull::Up),
            LineConfig::new(Edge::Rising, Pull::External),
            LineConfig::new(Edge::Falling, Pull::Up),
        ],
        bindings: [
            (EventLine::A, Command::Reset),
            (EventLine::B, Command::Pause),
            (EventLine::C, Command::Resume),
        ],
    };

    pub const fn with_tick_period_us(mut self, us: u32) -> Self {
        self.tick_period_us = us;
        self
    }

    pub const fn with_digit_hold_ms(mut self, ms: u32) -> Self {
        self.digit_hold_ms = ms;
        self
    }

    pub const fn with_scan_order(mut self, order: ScanOrder) -> Self {
        self.scan_order = order;
        self
    }

    pub const fn with_line(mut self, line: EventLine, config: LineConfig) -> Self {
        self.lines[line.index()] = config;
        self
    }

    pub const fn with_bindings(mut self, bindings: [(EventLine, Command); EVENT_LINES]) -> Self {
        self.bindings = bindings;
        self
    }

    pub const fn line(&self, line: EventLine) -> LineConfig {
        self.lines[line.index()]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_us == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.digit_hold_ms == 0 {
            return Err(ConfigError::ZeroDigitHold);
        }
        let mut seen = [false; EVENT_LINES];
        for &(line, command) in self.bindings.iter() {
            if command == Command::Tick {
                return Err(ConfigError::TickOnEventLine(line));
            }
            if core::mem::replace(&mut seen[line.index()], true) {
                return Err(ConfigError::DuplicateLine(line));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StopwatchConfig::default();
        assert_eq!(config.tick_period_us, 1_000_000);
        assert_eq!(config.digit_hold_ms, 4);
        assert_eq!(config.scan_order, ScanOrder::Reversed);
        assert_eq!(config.line(EventLine::A), LineConfig::new(Edge::Falling, Pull::Up));
        assert_eq!(config.line(EventLine::B), LineConfig::new(Edge::Rising, Pull::External));
        assert_eq!(config.line(EventLine::C), LineConfig::new(Edge::Falling, Pull::Up));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_builders() {
        let config = StopwatchConfig::DEFAULT
            .with_tick_period_us(500_000)
            .with_digit_hold_ms(2)
            .with_scan_order(ScanOrder::Forward)
            .with_line(EventLine::B, LineConfig::new(Edge::Falling, Pull::Up));
        assert_eq!(config.tick_period_us, 500_000);
        assert_eq!(config.digit_hold_ms, 2);
        assert_eq!(config.scan_order, ScanOrder::Forward);
        assert_eq!(config.line(EventLine::B).edge, Edge::Falling);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_zero_timing() {
        assert_eq!(
            StopwatchConfig::DEFAULT.with_tick_period_us(0).validate(),
            Err(ConfigError::ZeroTickPeriod)
        );
        assert_eq!(
            StopwatchConfig::DEFAULT.with_digit_hold_ms(0).validate(),
            Err(ConfigError::ZeroDigitHold)
        );
    }

    #[test]
    fn test_validate_duplicate_line() {
        let config = StopwatchConfig::DEFAULT.with_bindings([
            (EventLine::A, Command::Reset),
            (EventLine::C, Command::Pause),
            (EventLine::C, Command::Resume),
        ]);
        assert_eq!(config.validate(), Err(ConfigError::DuplicateLine(EventLine::C)));
    }

    #[test]
    fn test_validate_tick_on_line() {
        let config = StopwatchConfig::DEFAULT.with_bindings([
            (EventLine::A, Command::Tick),
            (EventLine::B, Command::Pause),
            (EventLine::C, Command::Resume),
        ]);
        assert_eq!(config.validate(), Err(ConfigError::TickOnEventLine(EventLine::A)));
    }
}
