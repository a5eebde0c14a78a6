//! Stopwatch state and the four control actions.
//!
//! [`Stopwatch`] is the plain state machine. [`SharedStopwatch`] puts it
//! behind a critical section so the actions can run from interrupt handlers
//! while the main loop reads the display buffer: each action updates the
//! time and rebuilds the buffer inside one critical section, and readers copy
//! the whole buffer inside one, so a half-written buffer is never seen.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::clock::TimeState;
use crate::display::DisplayBuffer;

/// Consistent view of the stopwatch taken in one critical section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub time: TimeState,
    pub display: DisplayBuffer,
    pub counting: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stopwatch {
    time: TimeState,
    display: DisplayBuffer,
    counting: bool,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// `00:00:00`, counting.
    pub const fn new() -> Self {
        Self {
            time: TimeState::ZERO,
            display: DisplayBuffer::ZERO,
            counting: true,
        }
    }

    /// Starts from a preset time, counting.
    pub const fn starting_at(time: TimeState) -> Self {
        Self {
            time,
            display: DisplayBuffer::from_time(&time),
            counting: true,
        }
    }

    /// Advances one second unless paused. Returns whether the time changed.
    pub fn tick(&mut self) -> bool {
        if !self.counting {
            return false;
        }
        self.time.advance();
        self.display = DisplayBuffer::from_time(&self.time);
        true
    }

    /// Zeroes the time. Does not touch the paused/counting mode.
    pub fn reset(&mut self) {
        self.time.clear();
        self.display = DisplayBuffer::from_time(&self.time);
    }

    /// Stops ticks from counting. Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        core::mem::replace(&mut self.counting, false)
    }

    /// Lets ticks count again. Returns `false` if already counting.
    pub fn resume(&mut self) -> bool {
        !core::mem::replace(&mut self.counting, true)
    }

    pub fn time(&self) -> TimeState {
        self.time
    }

    pub fn display(&self) -> DisplayBuffer {
        self.display
    }

    pub fn is_counting(&self) -> bool {
        self.counting
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            display: self.display,
            counting: self.counting,
        }
    }
}

/// A [`Stopwatch`] that can live in a `static` and be driven from interrupts.
pub struct SharedStopwatch {
    inner: Mutex<RefCell<Stopwatch>>,
}

impl Default for SharedStopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedStopwatch {
    pub const fn new() -> Self {
        Self::from_stopwatch(Stopwatch::new())
    }

    pub const fn from_stopwatch(stopwatch: Stopwatch) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(stopwatch)),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Stopwatch) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.inner.borrow_ref_mut(cs)))
    }

    pub fn tick(&self) -> bool {
        self.with(Stopwatch::tick)
    }

    pub fn reset(&self) {
        self.with(Stopwatch::reset);
        debug!("stopwatch reset");
    }

    pub fn pause(&self) -> bool {
        let changed = self.with(Stopwatch::pause);
        if changed {
            debug!("stopwatch paused");
        }
        changed
    }

    pub fn resume(&self) -> bool {
        let changed = self.with(Stopwatch::resume);
        if changed {
            debug!("stopwatch resumed");
        }
        changed
    }

    pub fn time(&self) -> TimeState {
        self.with(|s| s.time())
    }

    /// Copy of the current buffer. This is what the refresh loop samples.
    pub fn display(&self) -> DisplayBuffer {
        self.with(|s| s.display())
    }

    pub fn is_counting(&self) -> bool {
        self.with(|s| s.is_counting())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.with(|s| s.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn at(h: u8, m: u8, s: u8) -> TimeState {
        TimeState::new(h, m, s).unwrap()
    }

    fn assert_consistent(snap: &Snapshot) {
        assert_eq!(snap.display, DisplayBuffer::from_time(&snap.time));
        let t = snap.time;
        assert!(t.seconds() < 60 && t.minutes() < 60 && t.hours() < 24);
    }

    #[test]
    fn test_initial_state() {
        let sw = Stopwatch::new();
        assert_eq!(sw.time(), TimeState::ZERO);
        assert_eq!(sw.display(), DisplayBuffer::ZERO);
        assert!(sw.is_counting());
    }

    #[test]
    fn test_tick_updates_display() {
        let mut sw = Stopwatch::starting_at(at(12, 34, 55));
        assert!(sw.tick());
        assert_eq!(sw.time(), at(12, 34, 56));
        assert_eq!(sw.display().digits(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_tick_counts() {
        let mut sw = Stopwatch::new();
        for _ in 0..60 {
            sw.tick();
        }
        assert_eq!(sw.time(), at(0, 1, 0));

        let mut sw = Stopwatch::new();
        for _ in 0..3600 {
            sw.tick();
        }
        assert_eq!(sw.time(), at(1, 0, 0));
        assert_eq!(sw.display().digits(), [0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_full_day_wraps() {
        let mut sw = Stopwatch::new();
        for _ in 0..86_400 {
            sw.tick();
            assert_consistent(&sw.snapshot());
        }
        assert_eq!(sw.time(), TimeState::ZERO);
        assert_eq!(sw.display(), DisplayBuffer::ZERO);
    }

    #[test]
    fn test_wrap_rebuilds_display() {
        let mut sw = Stopwatch::starting_at(at(23, 59, 59));
        assert!(sw.tick());
        assert_eq!(sw.display(), DisplayBuffer::ZERO);
    }

    #[test]
    fn test_tick_while_paused_is_noop() {
        let mut sw = Stopwatch::starting_at(at(1, 2, 3));
        sw.pause();
        let before = sw.snapshot();
        for _ in 0..10 {
            assert!(!sw.tick());
        }
        assert_eq!(sw.snapshot(), before);
    }

    #[test]
    fn test_paused_ticks_are_dropped() {
        let mut sw = Stopwatch::starting_at(at(0, 0, 30));
        sw.pause();
        for _ in 0..100 {
            sw.tick();
        }
        sw.resume();
        sw.tick();
        assert_eq!(sw.time(), at(0, 0, 31));
    }

    #[test]
    fn test_pause_resume_idempotent() {
        let mut sw = Stopwatch::new();
        assert!(sw.pause());
        assert!(!sw.pause());
        assert!(!sw.is_counting());
        assert!(sw.resume());
        assert!(!sw.resume());
        assert!(sw.is_counting());
    }

    #[test]
    fn test_pause_keeps_time_and_display() {
        let mut sw = Stopwatch::starting_at(at(4, 5, 6));
        sw.pause();
        assert_eq!(sw.time(), at(4, 5, 6));
        assert_eq!(sw.display().digits(), [0, 4, 0, 5, 0, 6]);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut sw = Stopwatch::starting_at(at(9, 59, 59));
        sw.reset();
        assert_eq!(sw.time(), TimeState::ZERO);
        assert_eq!(sw.display(), DisplayBuffer::ZERO);
        assert!(sw.is_counting());

        let mut sw = Stopwatch::starting_at(at(22, 1, 1));
        sw.pause();
        sw.reset();
        assert_eq!(sw.time(), TimeState::ZERO);
        assert_eq!(sw.display(), DisplayBuffer::ZERO);
        assert!(!sw.is_counting());
    }

    #[test]
    fn test_shared_actions() {
        let sw = SharedStopwatch::new();
        assert!(sw.tick());
        assert!(sw.tick());
        assert_eq!(sw.time(), at(0, 0, 2));
        assert!(sw.pause());
        assert!(!sw.tick());
        assert!(!sw.is_counting());
        assert!(sw.resume());
        sw.reset();
        let snap = sw.snapshot();
        assert_eq!(snap.time, TimeState::ZERO);
        assert!(snap.counting);
        assert_eq!(sw.display(), DisplayBuffer::ZERO);
    }

    #[test]
    fn test_shared_static() {
        static SW: SharedStopwatch = SharedStopwatch::new();
        SW.tick();
        assert_eq!(SW.display().digit(DisplayBuffer::SEC_UNITS), 1);
    }

    #[test]
    fn test_concurrent_reads_never_torn() {
        let sw = SharedStopwatch::from_stopwatch(Stopwatch::starting_at(at(23, 59, 0)));
        let done = AtomicBool::new(false);

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..20_000u32 {
                    sw.tick();
                    if i % 997 == 0 {
                        sw.reset();
                    }
                }
                done.store(true, Ordering::Release);
            });

            while !done.load(Ordering::Acquire) {
                let buffer = sw.display();
                assert!(buffer.to_time().is_some(), "torn read: {:?}", buffer);
                assert_consistent(&sw.snapshot());
            }
        });

        assert_consistent(&sw.snapshot());
    }
}
