//! Start-up configuration errors.
//!
//! The running stopwatch has no error paths; everything that can be wrong is
//! caught by [`StopwatchConfig::validate`](crate::config::StopwatchConfig::validate)
//! before any callback is bound.

use core::fmt;

use crate::registry::EventLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period of zero microseconds
    ZeroTickPeriod,

    /// Digit hold of zero milliseconds
    ZeroDigitHold,

    /// The same event line appears in more than one binding
    DuplicateLine(EventLine),

    /// An event line is bound to the tick command, which belongs to the timer
    TickOnEventLine(EventLine),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTickPeriod => write!(f, "tick period must be non-zero"),
            ConfigError::ZeroDigitHold => write!(f, "digit hold must be non-zero"),
            ConfigError::DuplicateLine(line) => write!(f, "event line {} bound twice", line),
            ConfigError::TickOnEventLine(line) => {
                write!(f, "event line {} bound to tick", line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_display() {
        assert_eq!(ConfigError::ZeroTickPeriod.to_string(), "tick period must be non-zero");
        assert_eq!(
            ConfigError::DuplicateLine(EventLine::B).to_string(),
            "event line B bound twice"
        );
        assert_eq!(
            ConfigError::TickOnEventLine(EventLine::C).to_string(),
            "event line C bound to tick"
        );
    }
}
