/// Console health and liveness
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok`, or `degraded` once the timer has shut down
    pub status: &'static str,
    pub version: &'static str,
    pub timer_ticking: bool,
    pub timer_available: bool,
    pub projection_windows: usize,
}

/// GET /api/health - Console liveness plus sync diagnostics
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let timer_available = app_state.timer.get_state().await.is_some();

    Json(HealthResponse {
        status: if timer_available { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timer_ticking: timer_available && app_state.timer.is_started(),
        timer_available,
        projection_windows: app_state.projection_registry.len(),
    })
}
