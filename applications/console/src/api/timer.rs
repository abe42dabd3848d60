/// Timer API routes
use crate::{
    error::{ConsoleError, Result},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use lectern_core::{TimerSeed, TimerState};

/// POST /api/timer/command - Apply one timer command
///
/// The body is a tagged command (`{"type": "addTime", "seconds": 60}`).
/// Commands are fire-and-forget; the response carries the resulting state.
pub async fn command(
    State(app_state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<TimerState>)> {
    let command = lectern_timer::parse_command(body)?;
    app_state.timer_command(command).await;

    let state = current_state(&app_state).await?;
    Ok((StatusCode::ACCEPTED, Json(state)))
}

/// GET /api/timer/state - Current timer snapshot
pub async fn get_state(State(app_state): State<AppState>) -> Result<Json<TimerState>> {
    Ok(Json(current_state(&app_state).await?))
}

/// POST /api/timer/initialize - Seed the timer once
pub async fn initialize(
    State(app_state): State<AppState>,
    Json(seed): Json<TimerSeed>,
) -> Result<Json<TimerState>> {
    app_state.timer.initialize(seed).await?;
    app_state.persist_settings().await;

    Ok(Json(current_state(&app_state).await?))
}

async fn current_state(app_state: &AppState) -> Result<TimerState> {
    app_state
        .timer
        .get_state()
        .await
        .ok_or_else(|| ConsoleError::Unavailable("timer has shut down".to_string()))
}
