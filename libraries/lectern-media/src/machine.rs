//! Media state machine
//!
//! A single flat state: the playlist, a pointer into it, and the per-item
//! viewport. Moving to another item resets the transient per-item fields
//! (zoom, pan, PDF page, playback position).

use crate::events::MediaEvent;
use lectern_core::{MediaCommand, MediaItem, MediaState, Pan, MAX_ZOOM, MIN_ZOOM};
use tracing::debug;

/// Playlist / playback / viewport state machine
#[derive(Debug, Default)]
pub struct MediaMachine {
    state: MediaState,
    pending_events: Vec<MediaEvent>,
}

impl MediaMachine {
    /// Create an empty machine
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command, then queue a full snapshot unconditionally
    pub fn handle_command(&mut self, command: MediaCommand) {
        let name = command.name();

        match command {
            MediaCommand::SetPlaylist { items, start_index } => {
                self.set_playlist(items, start_index)
            }
            MediaCommand::Play => {
                if self.state.playlist.is_empty() {
                    debug!(command = name, "Nothing to play");
                } else {
                    self.state.is_playing = true;
                }
            }
            MediaCommand::Pause => self.state.is_playing = false,
            MediaCommand::Stop => {
                self.state.is_playing = false;
                self.state.current_time = 0.0;
                self.state.restart_trigger += 1;
            }
            MediaCommand::Next => {
                let next = self.state.current_index + 1;
                self.move_to(next);
            }
            MediaCommand::Prev => {
                let prev = self.state.current_index - 1;
                self.move_to(prev);
            }
            MediaCommand::Jump { index } => match index {
                Some(index) => self.move_to(index),
                None => debug!(command = name, "Jump without index"),
            },
            MediaCommand::Seek { time } => {
                if let Some(time) = time.filter(|t| t.is_finite()) {
                    self.state.current_time = time.max(0.0);
                }
            }
            MediaCommand::SetZoom { level } => {
                if let Some(level) = level.filter(|l| l.is_finite()) {
                    self.state.zoom_level = level.clamp(MIN_ZOOM, MAX_ZOOM);
                }
            }
            MediaCommand::SetPan { x, y } => {
                if let Some(x) = x.filter(|v| v.is_finite()) {
                    self.state.pan.x = x;
                }
                if let Some(y) = y.filter(|v| v.is_finite()) {
                    self.state.pan.y = y;
                }
            }
            MediaCommand::SetPdfPage { page } => {
                if let Some(page) = page {
                    self.state.pdf_page = page.max(1);
                }
            }
            MediaCommand::SetVolume { volume } => {
                if let Some(volume) = volume.filter(|v| v.is_finite()) {
                    self.state.volume = volume.clamp(0.0, 1.0);
                }
            }
            MediaCommand::ToggleGrid => self.state.show_grid = !self.state.show_grid,
            MediaCommand::Exit => self.exit(),
        }

        debug!(
            command = name,
            index = self.state.current_index,
            playing = self.state.is_playing,
            "Media command applied"
        );
        self.emit_state_changed();
    }

    fn set_playlist(&mut self, items: Vec<MediaItem>, start_index: Option<i64>) {
        let len = items.len() as i64;
        let index = match start_index {
            Some(i) if (0..len).contains(&i) => i,
            _ if len == 0 => -1,
            _ => 0,
        };

        self.state.playlist = items;
        self.state.current_index = index;
        self.state.is_playing = false;
        self.state.show_grid = false;
        self.reset_item_state();
    }

    /// Point at `index` if it is inside the playlist
    fn move_to(&mut self, index: i64) {
        if index < 0 || index >= self.state.playlist.len() as i64 {
            debug!(index, len = self.state.playlist.len(), "Index out of range");
            return;
        }
        self.state.current_index = index;
        self.reset_item_state();
    }

    fn reset_item_state(&mut self) {
        self.state.zoom_level = 1.0;
        self.state.pan = Pan::default();
        self.state.pdf_page = 1;
        self.state.current_time = 0.0;
    }

    /// Back to the empty state; volume and the restart counter survive
    fn exit(&mut self) {
        self.state = MediaState {
            volume: self.state.volume,
            restart_trigger: self.state.restart_trigger,
            revision: self.state.revision,
            ..MediaState::default()
        };
    }

    // ===== State Queries =====

    /// Current snapshot
    pub fn state(&self) -> &MediaState {
        &self.state
    }

    /// Item under the current index
    pub fn current_item(&self) -> Option<&MediaItem> {
        self.state.current_item()
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit_state_changed(&mut self) {
        self.state.revision += 1;
        self.pending_events
            .push(MediaEvent::StateChanged(self.state.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::MediaKind;

    fn item(id: &str, kind: MediaKind) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            path: format!("/media/{id}"),
            name: id.to_string(),
            kind,
            duration: None,
        }
    }

    fn loaded(n: usize) -> MediaMachine {
        let mut m = MediaMachine::new();
        let items = (0..n)
            .map(|i| item(&format!("item{i}"), MediaKind::Video))
            .collect();
        m.handle_command(MediaCommand::SetPlaylist {
            items,
            start_index: Some(0),
        });
        m
    }

    #[test]
    fn out_of_range_start_index_falls_back() {
        let mut m = MediaMachine::new();
        m.handle_command(MediaCommand::SetPlaylist {
            items: vec![item("a", MediaKind::Image)],
            start_index: Some(7),
        });
        assert_eq!(m.state().current_index, 0);

        m.handle_command(MediaCommand::SetPlaylist {
            items: vec![],
            start_index: Some(0),
        });
        assert_eq!(m.state().current_index, -1);
    }

    #[test]
    fn play_on_empty_playlist_is_noop() {
        let mut m = MediaMachine::new();
        m.handle_command(MediaCommand::Play);
        assert!(!m.state().is_playing);
        // Still broadcast
        assert_eq!(m.drain_events().len(), 1);
    }

    #[test]
    fn stop_rewinds_and_bumps_restart_trigger() {
        let mut m = loaded(2);
        m.handle_command(MediaCommand::Play);
        m.handle_command(MediaCommand::Seek { time: Some(42.0) });
        m.handle_command(MediaCommand::Stop);
        m.handle_command(MediaCommand::Stop);

        assert!(!m.state().is_playing);
        assert_eq!(m.state().current_time, 0.0);
        assert_eq!(m.state().restart_trigger, 2);
    }

    #[test]
    fn boundaries_do_not_wrap() {
        let mut m = loaded(2);
        m.handle_command(MediaCommand::Prev);
        assert_eq!(m.state().current_index, 0);

        m.handle_command(MediaCommand::Next);
        m.handle_command(MediaCommand::Next);
        assert_eq!(m.state().current_index, 1);

        m.handle_command(MediaCommand::Jump { index: Some(5) });
        m.handle_command(MediaCommand::Jump { index: Some(-1) });
        m.handle_command(MediaCommand::Jump { index: None });
        assert_eq!(m.state().current_index, 1);
    }

    #[test]
    fn viewport_values_are_clamped() {
        let mut m = loaded(1);
        m.handle_command(MediaCommand::SetZoom { level: Some(99.0) });
        assert_eq!(m.state().zoom_level, MAX_ZOOM);
        m.handle_command(MediaCommand::SetZoom { level: Some(0.0) });
        assert_eq!(m.state().zoom_level, MIN_ZOOM);
        m.handle_command(MediaCommand::SetZoom {
            level: Some(f64::NAN),
        });
        assert_eq!(m.state().zoom_level, MIN_ZOOM);

        m.handle_command(MediaCommand::SetPdfPage { page: Some(0) });
        assert_eq!(m.state().pdf_page, 1);

        m.handle_command(MediaCommand::SetVolume { volume: Some(1.5) });
        assert_eq!(m.state().volume, 1.0);

        m.handle_command(MediaCommand::Seek { time: Some(-3.0) });
        assert_eq!(m.state().current_time, 0.0);
    }

    #[test]
    fn pan_updates_each_axis_independently() {
        let mut m = loaded(1);
        m.handle_command(MediaCommand::SetPan {
            x: Some(10.0),
            y: None,
        });
        m.handle_command(MediaCommand::SetPan {
            x: None,
            y: Some(-4.0),
        });
        assert_eq!(m.state().pan, Pan { x: 10.0, y: -4.0 });
    }

    #[test]
    fn exit_returns_to_empty_state() {
        let mut m = loaded(3);
        m.handle_command(MediaCommand::SetVolume { volume: Some(0.4) });
        m.handle_command(MediaCommand::Stop);
        m.handle_command(MediaCommand::ToggleGrid);
        m.handle_command(MediaCommand::Exit);

        let state = m.state();
        assert!(state.playlist.is_empty());
        assert_eq!(state.current_index, -1);
        assert!(!state.show_grid);
        assert_eq!(state.volume, 0.4);
        assert_eq!(state.restart_trigger, 1);
    }

    #[test]
    fn every_command_gets_a_new_revision() {
        let mut m = loaded(1);
        m.handle_command(MediaCommand::Pause);
        m.handle_command(MediaCommand::Pause);
        m.handle_command(MediaCommand::Exit);

        let revisions: Vec<u64> = m
            .drain_events()
            .iter()
            .map(|e| e.state().revision)
            .collect();
        assert_eq!(revisions, vec![1, 2, 3, 4]);
    }
}
