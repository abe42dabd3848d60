//! Media state machine scenarios

use lectern_core::{MediaCommand, MediaItem, MediaKind, Pan};
use lectern_media::MediaMachine;

fn item(id: &str, kind: MediaKind) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        path: format!("/media/{id}"),
        name: id.to_uppercase(),
        kind,
        duration: Some(30.0),
    }
}

fn abc() -> Vec<MediaItem> {
    vec![
        item("a", MediaKind::Video),
        item("b", MediaKind::Pdf),
        item("c", MediaKind::Image),
    ]
}

#[test]
fn set_playlist_then_next_resets_item_state() {
    let mut media = MediaMachine::new();
    media.handle_command(MediaCommand::ToggleGrid);
    media.handle_command(MediaCommand::SetZoom { level: Some(3.0) });

    media.handle_command(MediaCommand::SetPlaylist {
        items: abc(),
        start_index: Some(1),
    });

    let state = media.state();
    assert_eq!(state.current_index, 1);
    assert!(!state.is_playing);
    assert_eq!(state.zoom_level, 1.0);
    assert!(!state.show_grid);
    assert_eq!(media.current_item().map(|i| i.id.as_str()), Some("b"));

    media.handle_command(MediaCommand::SetZoom { level: Some(2.5) });
    media.handle_command(MediaCommand::SetPan {
        x: Some(12.0),
        y: Some(8.0),
    });
    media.handle_command(MediaCommand::SetPdfPage { page: Some(4) });
    media.handle_command(MediaCommand::Next);

    let state = media.state();
    assert_eq!(state.current_index, 2);
    assert_eq!(state.zoom_level, 1.0);
    assert_eq!(state.pan, Pan::default());
    assert_eq!(state.pdf_page, 1);
    assert_eq!(state.current_time, 0.0);
}

#[test]
fn set_playlist_stops_playback() {
    let mut media = MediaMachine::new();
    media.handle_command(MediaCommand::SetPlaylist {
        items: abc(),
        start_index: None,
    });
    media.handle_command(MediaCommand::Play);
    assert!(media.state().is_playing);

    media.handle_command(MediaCommand::SetPlaylist {
        items: abc(),
        start_index: Some(2),
    });
    assert!(!media.state().is_playing);
    assert_eq!(media.state().current_index, 2);
}

#[test]
fn navigation_keeps_play_state() {
    let mut media = MediaMachine::new();
    media.handle_command(MediaCommand::SetPlaylist {
        items: abc(),
        start_index: Some(0),
    });
    media.handle_command(MediaCommand::Play);
    media.handle_command(MediaCommand::Jump { index: Some(2) });
    media.handle_command(MediaCommand::Prev);

    assert_eq!(media.state().current_index, 1);
    assert!(media.state().is_playing);
}

#[test]
fn commands_round_trip_from_json() {
    let mut media = MediaMachine::new();
    let commands = [
        r#"{"type":"setPlaylist","items":[{"id":"a","path":"/a","name":"A","kind":"audio"}]}"#,
        r#"{"type":"play"}"#,
        r#"{"type":"seek","time":12.5}"#,
        r#"{"type":"setVolume","volume":0.25}"#,
    ];

    for raw in commands {
        let command: MediaCommand = serde_json::from_str(raw).unwrap();
        media.handle_command(command);
    }

    let state = media.state();
    assert_eq!(state.current_index, 0);
    assert!(state.is_playing);
    assert_eq!(state.current_time, 12.5);
    assert_eq!(state.volume, 0.25);
    assert_eq!(state.revision, 4);
}
