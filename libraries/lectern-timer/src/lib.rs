//! Lectern Timer
//!
//! Authoritative countdown, wall clock, and stopwatch for the control
//! process.
//!
//! This crate provides:
//! - `TimerMachine`: pure state machine with a drift-free countdown
//! - `TimerService`: tokio tick loop plus the command / state / subscribe
//!   surface, fanning events out through a `WindowRegistry`
//!
//! # Broadcast resolution
//!
//! The machine ticks internally every 100ms but only puts a lightweight
//! `timer-tick` on the wire when the whole-second display value changed, or
//! continuously while the stopwatch runs. Every command produces a full
//! `timer-settings-sync` snapshot.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::{ManualClock, RunState, TimerCommand};
//! use lectern_timer::{TimerConfig, TimerMachine};
//! use std::sync::Arc;
//!
//! let clock = ManualClock::new(0);
//! let mut timer = TimerMachine::new(Arc::new(clock.clone()), TimerConfig::default());
//!
//! timer.handle_command(TimerCommand::SetDuration { duration: Some(10) });
//! timer.handle_command(TimerCommand::Start);
//!
//! clock.advance(10_000);
//! timer.tick();
//!
//! assert_eq!(timer.state().remaining_time, 0);
//! assert_eq!(timer.state().state, RunState::Stopped);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod machine;
pub mod service;

pub use error::{Result, TimerError};
pub use events::TimerEvent;
pub use machine::{TimerConfig, TimerMachine, MAX_DURATION_SECS};
pub use service::{parse_command, TimerService, DEFAULT_TICK_INTERVAL};
