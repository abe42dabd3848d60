//! Lectern Media
//!
//! Authoritative playlist, playback, and viewport state for the projection
//! display.
//!
//! Every command produces a full `media-update` snapshot. No deduplication
//! happens here; the producer is the sole owner of truth and the consuming
//! side's message manager and revision guard deal with repeats.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::{MediaCommand, MediaItem, MediaKind};
//! use lectern_media::MediaMachine;
//!
//! let item = |id: &str| MediaItem {
//!     id: id.to_string(),
//!     path: format!("/media/{id}.mp4"),
//!     name: id.to_uppercase(),
//!     kind: MediaKind::Video,
//!     duration: None,
//! };
//!
//! let mut media = MediaMachine::new();
//! media.handle_command(MediaCommand::SetPlaylist {
//!     items: vec![item("a"), item("b")],
//!     start_index: Some(0),
//! });
//! media.handle_command(MediaCommand::Next);
//!
//! assert_eq!(media.state().current_index, 1);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod machine;
pub mod service;

pub use error::{MediaError, Result};
pub use events::MediaEvent;
pub use machine::MediaMachine;
pub use service::{parse_command, MediaService};
