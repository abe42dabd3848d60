//! Domain handlers for the projection window
//!
//! Each handler owns a disjoint slice of `MessageType`. Timer and media
//! snapshots carry a revision; anything older than what the mirror holds is
//! claimed but discarded.

use crate::mirror::MirrorState;
use crate::router::MessageHandler;
use lectern_core::{AppMessage, MessageType};
use tracing::{debug, trace};

/// View, visibility, theme, locale, and lifecycle
pub struct ProjectionHandler;

impl MessageHandler for ProjectionHandler {
    fn name(&self) -> &'static str {
        "projection"
    }

    fn owns(&self) -> &'static [MessageType] {
        &[
            MessageType::ViewChange,
            MessageType::ProjectionContentToggle,
            MessageType::ThemeUpdate,
            MessageType::LocaleUpdate,
            MessageType::System,
        ]
    }

    fn handle(&self, message: &AppMessage, state: &mut MirrorState) -> bool {
        match message {
            AppMessage::ViewChange(data) => state.view = data.view,
            AppMessage::ProjectionContentToggle(data) => state.content_visible = data.visible,
            AppMessage::ThemeUpdate(data) => state.theme = Some(data.theme.clone()),
            AppMessage::LocaleUpdate(data) => state.locale = Some(data.locale.clone()),
            AppMessage::System(data) => {
                debug!(event = ?data.event, detail = ?data.detail, "System event");
                state.last_system_event = Some(data.event);
            }
            _ => return false,
        }
        true
    }
}

/// Media snapshots and transient media intents
pub struct MediaHandler;

impl MessageHandler for MediaHandler {
    fn name(&self) -> &'static str {
        "media"
    }

    fn owns(&self) -> &'static [MessageType] {
        &[MessageType::MediaUpdate, MessageType::MediaControl]
    }

    fn handle(&self, message: &AppMessage, state: &mut MirrorState) -> bool {
        match message {
            AppMessage::MediaUpdate(media) => {
                let current = state.media.as_ref().map_or(0, |m| m.revision);
                if media.revision < current {
                    trace!(incoming = media.revision, current, "Stale media snapshot");
                } else {
                    state.media = Some(media.clone());
                }
            }
            AppMessage::MediaControl(control) => state.media_control = Some(control.clone()),
            _ => return false,
        }
        true
    }
}

/// Scripture passage and font size
pub struct BibleHandler;

impl MessageHandler for BibleHandler {
    fn name(&self) -> &'static str {
        "bible"
    }

    fn owns(&self) -> &'static [MessageType] {
        &[MessageType::BibleContentSync, MessageType::BibleFontSize]
    }

    fn handle(&self, message: &AppMessage, state: &mut MirrorState) -> bool {
        match message {
            AppMessage::BibleContentSync(content) => state.bible = Some(content.clone()),
            AppMessage::BibleFontSize(data) => state.font_size = Some(data.size),
            _ => return false,
        }
        true
    }
}

/// Timer snapshots and ticks
pub struct TimerHandler;

impl MessageHandler for TimerHandler {
    fn name(&self) -> &'static str {
        "timer"
    }

    fn owns(&self) -> &'static [MessageType] {
        &[MessageType::TimerTick, MessageType::TimerSettingsSync]
    }

    fn handle(&self, message: &AppMessage, state: &mut MirrorState) -> bool {
        match message {
            AppMessage::TimerSettingsSync(timer) => {
                let current = state.timer.as_ref().map_or(0, |t| t.revision);
                if timer.revision < current {
                    trace!(incoming = timer.revision, current, "Stale timer snapshot");
                } else {
                    state.timer = Some(timer.clone());
                }
            }
            AppMessage::TimerTick(tick) => match state.timer.as_mut() {
                Some(timer) if tick.revision >= timer.revision => {
                    timer.remaining_time = tick.remaining_time;
                    timer.current_time = tick.current_time;
                    timer.stopwatch_elapsed_time = tick.stopwatch_elapsed_time;
                    timer.revision = tick.revision;
                }
                Some(timer) => {
                    trace!(incoming = tick.revision, current = timer.revision, "Stale timer tick");
                }
                // Ticks only patch a snapshot we already hold
                None => trace!("Timer tick before first snapshot"),
            },
            _ => return false,
        }
        true
    }
}
