/// Media API routes
use crate::{error::Result, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use lectern_core::MediaState;

/// POST /api/media/command - Apply one media command
pub async fn command(
    State(app_state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<MediaState>)> {
    let command = lectern_media::parse_command(body)?;
    app_state.media.command(command).await;

    Ok((StatusCode::ACCEPTED, Json(app_state.media.get_state().await)))
}

/// GET /api/media/state - Current media snapshot
pub async fn get_state(State(app_state): State<AppState>) -> Json<MediaState> {
    Json(app_state.media.get_state().await)
}
