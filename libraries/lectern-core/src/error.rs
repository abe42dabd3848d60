/// Core error types for Lectern
use thiserror::Error;

/// Result type alias using `LecternError`
pub type Result<T> = std::result::Result<T, LecternError>;

/// Core error type for Lectern
#[derive(Error, Debug)]
pub enum LecternError {
    /// Invalid input (malformed command payload, out-of-range value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A window or transport refused a message
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl LecternError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Failure delivering a message across the process boundary.
///
/// These never reach the issuer of a command: broadcasters log them and
/// carry on with the next target.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Target window has been destroyed
    #[error("Window destroyed: {0}")]
    WindowDestroyed(String),

    /// Receiving side of a channel is gone
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// Payload could not be encoded
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Any other send failure
    #[error("Send failed: {0}")]
    Send(String),
}
