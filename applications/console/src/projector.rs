//! Projection process client
//!
//! Connects to the control process's `/ws/projection` socket, announces
//! itself with `finished-loading`, and mirrors every frame it receives.
//! A dropped connection is retried with exponential backoff; each new
//! connection starts from a fresh mirror, exactly like a recreated window.

use futures_util::{SinkExt, StreamExt};
use lectern_core::{AppMessage, SystemEvent};
use lectern_projection::{MirrorState, ProjectionMirror};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// A headless projection window
#[derive(Default)]
pub struct Projector {
    mirror: ProjectionMirror,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw frame into the mirror
    ///
    /// Returns whether the mirrored state changed.
    pub fn handle_frame(&mut self, raw: &str) -> bool {
        let before = self.mirror.state().clone();
        self.mirror.dispatch_json(raw);
        let after = self.mirror.state();

        if before == *after {
            return false;
        }
        log_change(&before, after);
        true
    }

    pub fn state(&self) -> &MirrorState {
        self.mirror.state()
    }

    /// Forget everything mirrored so far
    pub fn reset(&mut self) {
        self.mirror = ProjectionMirror::new();
    }

    /// Mirror the control process at `url` until the task is cancelled
    pub async fn run(&mut self, url: &str) {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            match self.session(url).await {
                Ok(()) => {
                    info!(url, "Projection socket closed by control process");
                    backoff = INITIAL_BACKOFF;
                }
                Err(e) => {
                    warn!(operation = "projector_connect", url, error = %e, "Projection session failed");
                }
            }

            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    async fn session(&mut self, url: &str) -> anyhow::Result<()> {
        let (mut ws, _) = connect_async(url).await?;
        info!(url, "Connected to control process");

        self.reset();
        let hello = serde_json::to_string(&AppMessage::system(SystemEvent::FinishedLoading))?;
        ws.send(Message::Text(hello)).await?;

        while let Some(frame) = ws.next().await {
            match frame? {
                Message::Text(text) => {
                    self.handle_frame(&text);
                }
                Message::Ping(payload) => ws.send(Message::Pong(payload)).await?,
                Message::Close(_) => break,
                _ => {}
            }
        }

        Ok(())
    }
}

fn log_change(before: &MirrorState, after: &MirrorState) {
    if before.view != after.view {
        info!(view = ?after.view, "Projection view changed");
    }
    if before.content_visible != after.content_visible {
        info!(visible = after.content_visible, "Projection content toggled");
    }
    if before.theme != after.theme || before.locale != after.locale {
        info!(theme = ?after.theme, locale = ?after.locale, "Projection appearance changed");
    }
    if before.bible != after.bible {
        if let Some(bible) = &after.bible {
            info!(reference = %bible.reference, verses = bible.verses.len(), "Bible passage shown");
        }
    }
    if before.last_system_event != after.last_system_event {
        info!(event = ?after.last_system_event, "System event received");
    }

    if let Some(timer) = &after.timer {
        debug!(
            state = ?timer.state,
            remaining = timer.remaining_time,
            stopwatch = timer.stopwatch_elapsed_time,
            revision = timer.revision,
            "Timer mirrored"
        );
    }
    if before.media != after.media {
        if let Some(media) = &after.media {
            info!(
                index = media.current_index,
                playing = media.is_playing,
                revision = media.revision,
                "Media mirrored"
            );
        }
    }
}
