//! Lectern Core
//!
//! Platform-agnostic data model, time source, and broadcast plumbing shared by
//! the control process and every projection window.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TimerState`, `MediaState`, `AppMessage`
//! - **Core Traits**: `Clock`, `Window`
//! - **Broadcast**: `WindowRegistry` (one instance per state machine)
//! - **Error Handling**: Unified `LecternError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use lectern_core::{channels, AppMessage, ProjectionView, WindowRegistry};
//!
//! let registry = WindowRegistry::new();
//! assert!(registry.is_empty());
//!
//! // Nothing registered yet, so nobody receives the message
//! let delivered = registry.broadcast(
//!     channels::PROJECTION_MESSAGE,
//!     &AppMessage::view_change(ProjectionView::Bible),
//! );
//! assert_eq!(delivered, 0);
//! ```

#![forbid(unsafe_code)]

pub mod channels;
pub mod clock;
pub mod error;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LecternError, Result, TransportError};
pub use registry::{Window, WindowId, WindowRegistry};

pub use types::{
    // Bible payloads
    BibleContent, Verse,
    // Media
    MediaCommand, MediaItem, MediaKind, MediaState, Pan, MAX_ZOOM, MIN_ZOOM,
    // Messages
    AppMessage, ContentToggleData, FontSizeData, LocaleData, MediaControlData, MessageType,
    ProjectionView, SystemData, SystemEvent, ThemeData, ViewChangeData,
    // Timer
    RunState, TimerCommand, TimerMode, TimerSeed, TimerState, TimerTick,
    DEFAULT_TIMER_DURATION_SECS, DEFAULT_TIMEZONE,
};
