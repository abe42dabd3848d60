/// Projection API routes
use crate::{
    error::{ConsoleError, Result},
    state::{AppState, DisplayState},
};
use axum::{extract::State, http::StatusCode, Json};
use lectern_core::AppMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: serde_json::Value,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct SendBatchRequest {
    pub messages: Vec<serde_json::Value>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionStateResponse {
    pub windows: usize,
    pub pending: usize,
    pub display: DisplayState,
    pub last_sent: Option<AppMessage>,
}

/// POST /api/projection/message - Send one message through the manager
pub async fn send_message(
    State(app_state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<StatusCode> {
    let message = parse_message(request.message)?;
    app_state.send_projection(message, request.force).await;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/projection/batch - Send several messages in order
pub async fn send_batch(
    State(app_state): State<AppState>,
    Json(request): Json<SendBatchRequest>,
) -> Result<StatusCode> {
    let messages = request
        .messages
        .into_iter()
        .map(parse_message)
        .collect::<Result<Vec<_>>>()?;

    app_state
        .send_projection_batch(messages, request.force)
        .await;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/projection/resync - Push the full state to every window
pub async fn resync(State(app_state): State<AppState>) -> StatusCode {
    app_state.resync().await;
    StatusCode::ACCEPTED
}

/// GET /api/projection/state - Projection diagnostics
pub async fn get_state(State(app_state): State<AppState>) -> Json<ProjectionStateResponse> {
    Json(ProjectionStateResponse {
        windows: app_state.projection_registry.len(),
        pending: app_state.projection.pending_count().await,
        display: app_state.display.read().await.clone(),
        last_sent: app_state.projection.last_sent().await,
    })
}

fn parse_message(value: serde_json::Value) -> Result<AppMessage> {
    serde_json::from_value(value)
        .map_err(|e| ConsoleError::BadRequest(format!("invalid projection message: {e}")))
}
