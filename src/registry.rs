//! Interrupt callback registry.
//!
//! Each interrupt source gets one slot holding a zero-argument [`Action`].
//! Interrupt handlers call [`CallbackRegistry::on_tick`] or
//! [`CallbackRegistry::on_event`]; a firing on an empty slot is dropped.

use core::fmt;

use crate::config::StopwatchConfig;
use crate::error::ConfigError;
use crate::stopwatch::SharedStopwatch;

/// Number of discrete event lines.
pub const EVENT_LINES: usize = 3;

/// A discrete, edge-triggered event line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventLine {
    A,
    B,
    C,
}

impl EventLine {
    pub const ALL: [EventLine; EVENT_LINES] = [EventLine::A, EventLine::B, EventLine::C];

    pub const fn index(self) -> usize {
        match self {
            EventLine::A => 0,
            EventLine::B => 1,
            EventLine::C => 2,
        }
    }
}

impl fmt::Display for EventLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventLine::A => "A",
            EventLine::B => "B",
            EventLine::C => "C",
        };
        f.write_str(name)
    }
}

/// Something an interrupt can trigger. Takes no arguments; whatever it acts on
/// is captured when it is built.
pub trait Action {
    fn invoke(&self);
}

impl<F: Fn()> Action for F {
    fn invoke(&self) {
        self()
    }
}

/// Control actions of the stopwatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Tick,
    Reset,
    Pause,
    Resume,
}

/// A [`Command`] aimed at a particular stopwatch.
#[derive(Clone, Copy)]
pub struct Binding<'a> {
    command: Command,
    target: &'a SharedStopwatch,
}

impl<'a> Binding<'a> {
    pub const fn new(command: Command, target: &'a SharedStopwatch) -> Self {
        Self { command, target }
    }

    pub const fn command(&self) -> Command {
        self.command
    }
}

impl fmt::Debug for Binding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl Action for Binding<'_> {
    fn invoke(&self) {
        match self.command {
            Command::Tick => {
                self.target.tick();
            }
            Command::Reset => self.target.reset(),
            Command::Pause => {
                self.target.pause();
            }
            Command::Resume => {
                self.target.resume();
            }
        }
    }
}

/// One action slot for the tick source and one per event line.
pub struct CallbackRegistry<A> {
    tick: Option<A>,
    events: [Option<A>; EVENT_LINES],
}

impl<A: Action> Default for CallbackRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> CallbackRegistry<A> {
    pub const fn new() -> Self {
        Self {
            tick: None,
            events: [None, None, None],
        }
    }

    /// Replaces whatever was bound to the tick source.
    pub fn register_tick(&mut self, action: A) {
        self.tick = Some(action);
    }

    /// Replaces whatever was bound to `line`.
    pub fn register_event(&mut self, line: EventLine, action: A) {
        self.events[line.index()] = Some(action);
    }

    pub fn has_tick(&self) -> bool {
        self.tick.is_some()
    }

    pub fn is_bound(&self, line: EventLine) -> bool {
        self.events[line.index()].is_some()
    }

    /// Runs the tick action. Returns `false` if none is bound.
    pub fn on_tick(&self) -> bool {
        match &self.tick {
            Some(action) => {
                action.invoke();
                true
            }
            None => false,
        }
    }

    /// Runs the action bound to `line`. Returns `false` if none is bound.
    pub fn on_event(&self, line: EventLine) -> bool {
        match &self.events[line.index()] {
            Some(action) => {
                action.invoke();
                true
            }
            None => {
                trace!("event line {} unbound, dropped", line);
                false
            }
        }
    }
}

/// Binds the tick source and every configured event line to `stopwatch`.
pub fn bind<'a>(
    registry: &mut CallbackRegistry<Binding<'a>>,
    stopwatch: &'a SharedStopwatch,
    config: &StopwatchConfig,
) -> Result<(), ConfigError> {
    config.validate()?;
    registry.register_tick(Binding::new(Command::Tick, stopwatch));
    for &(line, command) in config.bindings.iter() {
        registry.register_event(line, Binding::new(command, stopwatch));
        info!("event line {} -> {}", line, command);
    }
    Ok(())
}
