//! Timer Events
//!
//! Events queued by the state machine and fanned out by the service:
//! - Full snapshot after every command (and on countdown completion)
//! - Lightweight tick when the whole-second display value changed, or
//!   continuously while the stopwatch runs

use lectern_core::{channels, AppMessage, TimerState, TimerTick};
use serde::{Deserialize, Serialize};

/// Events emitted by the timer state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Full state snapshot
    StateChanged(TimerState),

    /// Lightweight display update
    Tick(TimerTick),
}

impl TimerEvent {
    /// Broadcast channel this event travels on
    pub fn channel(&self) -> &'static str {
        match self {
            Self::StateChanged(_) => channels::TIMER_UPDATE,
            Self::Tick(_) => channels::TIMER_TICK,
        }
    }

    /// Revision stamped on the payload
    pub fn revision(&self) -> u64 {
        match self {
            Self::StateChanged(state) => state.revision,
            Self::Tick(tick) => tick.revision,
        }
    }

    /// Wire message for this event
    pub fn to_message(&self) -> AppMessage {
        match self {
            Self::StateChanged(state) => AppMessage::TimerSettingsSync(state.clone()),
            Self::Tick(tick) => AppMessage::TimerTick(*tick),
        }
    }
}
