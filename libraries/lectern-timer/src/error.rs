//! Error types for the timer service

use thiserror::Error;

/// Timer errors
///
/// None of these reach the issuer of a command; the service logs them and
/// carries on.
#[derive(Debug, Error)]
pub enum TimerError {
    /// Command payload could not be parsed (unknown name or bad shape)
    #[error("Invalid timer command: {0}")]
    InvalidCommand(#[from] serde_json::Error),

    /// `initialize` was called after the timer had already been seeded
    #[error("Timer already initialized")]
    AlreadyInitialized,

    /// Service has been shut down
    #[error("Timer service shut down")]
    ShutDown,
}

/// Result type for timer operations
pub type Result<T> = std::result::Result<T, TimerError>;
