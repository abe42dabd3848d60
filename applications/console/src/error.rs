/// Console error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] lectern_core::LecternError),
}

impl From<config::ConfigError> for ConsoleError {
    fn from(err: config::ConfigError) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

impl From<lectern_timer::TimerError> for ConsoleError {
    fn from(err: lectern_timer::TimerError) -> Self {
        let msg = err.to_string();
        match err {
            lectern_timer::TimerError::InvalidCommand(_) => ConsoleError::BadRequest(msg),
            lectern_timer::TimerError::AlreadyInitialized => ConsoleError::Conflict(msg),
            lectern_timer::TimerError::ShutDown => ConsoleError::Unavailable(msg),
        }
    }
}

impl From<lectern_media::MediaError> for ConsoleError {
    fn from(err: lectern_media::MediaError) -> Self {
        ConsoleError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ConsoleError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ConsoleError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ConsoleError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ConsoleError::Serialization(ref e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ConsoleError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ConsoleError::Connection(ref msg) => {
                tracing::error!("Connection error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Connection error".to_string())
            }
            ConsoleError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            ConsoleError::Core(ref e) => {
                tracing::error!("Core error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
