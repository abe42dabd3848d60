//! Lectern Projection
//!
//! Everything between an operator intent in the control window and the
//! mirrored state in a projection window.
//!
//! # Architecture
//!
//! Producer side (control process):
//! - [`Transport`]: IPC channel, registry fan-out, or the same-origin
//!   `postMessage` fallback
//! - [`MessageManager`]: dedup, per-key debounce, forced and batched sends,
//!   full resync
//!
//! Consumer side (projection window):
//! - [`DispatchRouter`]: fixed-priority chain of domain [`MessageHandler`]s
//! - [`ProjectionMirror`]: router plus [`MirrorState`], fed raw frames
//!
//! # Example
//!
//! ```rust
//! use lectern_core::{AppMessage, ProjectionView};
//! use lectern_projection::ProjectionMirror;
//!
//! let mut mirror = ProjectionMirror::new();
//! assert!(mirror.dispatch(&AppMessage::view_change(ProjectionView::Timer)));
//! assert!(!mirror.dispatch_json(r#"{"type":"hologram","data":{}}"#));
//! assert_eq!(mirror.state().view, ProjectionView::Timer);
//! ```

#![forbid(unsafe_code)]

pub mod handlers;
pub mod manager;
pub mod mirror;
pub mod router;
pub mod transport;
pub mod window;

pub use handlers::{BibleHandler, MediaHandler, ProjectionHandler, TimerHandler};
pub use manager::{requests_resync, MessageManager, ResyncSnapshot, DEFAULT_DEBOUNCE};
pub use mirror::{MirrorState, ProjectionMirror};
pub use router::{DispatchRouter, MessageHandler};
pub use transport::{
    ChannelTransport, OriginEnvelope, PostMessageBus, PostMessageReceiver, PostMessageTransport,
    ProjectionTransport, RegistryTransport, Transport,
};
pub use window::{check_projection_window, ensure_projection_window};
