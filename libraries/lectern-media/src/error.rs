//! Error types for the media service

use thiserror::Error;

/// Media errors
///
/// Only surfaced by [`parse_command`](crate::parse_command); the service logs
/// and swallows them.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Command payload could not be parsed (unknown name or bad shape)
    #[error("Invalid media command: {0}")]
    InvalidCommand(#[from] serde_json::Error),
}

/// Result type for media operations
pub type Result<T> = std::result::Result<T, MediaError>;
