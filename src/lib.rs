//! # digital-stopwatch
//!
//! Six-digit hours:minutes:seconds stopwatch for a microcontroller.
//!
//! - [`stopwatch`] holds the time and the tick/reset/pause/resume actions,
//!   shareable between interrupt handlers and the main loop.
//! - [`registry`] maps the tick source and three event lines to actions.
//! - [`display`] turns the time into six digits and scans them onto a
//!   multiplexed display one position at a time.
//!
//! The firmware binary (feature `firmware`) wires these to an RP2040.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod registry;
pub mod stopwatch;

pub use clock::TimeState;
pub use config::{Edge, LineConfig, Pull, StopwatchConfig};
pub use display::{DigitSink, DisplayBuffer, MultiplexedBcd, RefreshScheduler, ScanOrder};
pub use error::ConfigError;
pub use registry::{bind, Action, Binding, CallbackRegistry, Command, EventLine};
pub use stopwatch::{SharedStopwatch, Snapshot, Stopwatch};
