use core::fmt::Write;

use heapless::String;

pub const SECONDS_PER_MINUTE: u8 = 60;
pub const MINUTES_PER_HOUR: u8 = 60;
pub const HOURS_PER_DAY: u8 = 24;

/// Elapsed stopwatch time.
///
/// Fields stay within `0..60`, `0..60` and `0..24`. The only ways to change a
/// value are [`TimeState::advance`] and [`TimeState::clear`], and both leave it
/// in range before returning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeState {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl TimeState {
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Returns `None` if any field is out of range.
    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours >= HOURS_PER_DAY || minutes >= MINUTES_PER_HOUR || seconds >= SECONDS_PER_MINUTE {
            return None;
        }
        Some(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub const fn hours(&self) -> u8 {
        self.hours
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    pub const fn total_seconds(&self) -> u32 {
        self.hours as u32 * 3600 + self.minutes as u32 * 60 + self.seconds as u32
    }

    /// Adds one second, carrying seconds into minutes into hours.
    ///
    /// Hours wrap from 23 back to 0; there is no day counter.
    pub fn advance(&mut self) {
        self.seconds += 1;
        if self.seconds == SECONDS_PER_MINUTE {
            self.seconds = 0;
            self.minutes += 1;
        }
        if self.minutes == MINUTES_PER_HOUR {
            self.minutes = 0;
            self.hours += 1;
        }
        if self.hours == HOURS_PER_DAY {
            self.hours = 0;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::ZERO;
    }

    /// `HH:MM:SS`
    pub fn hms(&self) -> String<8> {
        let mut out = String::new();
        write!(out, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds).ok();
        out
    }
}
