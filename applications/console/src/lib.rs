//! Lectern Console
//!
//! The control process and the projection client in one crate.
//!
//! This crate provides:
//! - **Bootstrap**: configuration, settings persistence, service wiring
//! - **HTTP API**: timer, media, and projection control under `/api`
//! - **Projection socket**: `/ws/projection`, one `Window` per connection
//! - **Projector**: a headless projection window mirroring the socket
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod projector;
pub mod settings;
pub mod state;
pub mod ws;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use projector::Projector;
pub use settings::{PersistedSettings, SettingsStore};
pub use state::{AppState, DisplayState};
