//! Media Events

use lectern_core::{channels, AppMessage, MediaState};
use serde::{Deserialize, Serialize};

/// Events emitted by the media state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Full state snapshot, emitted after every command
    StateChanged(MediaState),
}

impl MediaEvent {
    /// Broadcast channel this event travels on
    pub fn channel(&self) -> &'static str {
        channels::MEDIA_UPDATE
    }

    /// Wire message for this event
    pub fn to_message(&self) -> AppMessage {
        match self {
            Self::StateChanged(state) => AppMessage::MediaUpdate(state.clone()),
        }
    }

    /// Snapshot carried by this event
    pub fn state(&self) -> &MediaState {
        match self {
            Self::StateChanged(state) => state,
        }
    }
}
