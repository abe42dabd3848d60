/// API route modules
pub mod health;
pub mod media;
pub mod projection;
pub mod timer;

use crate::{state::AppState, ws};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full HTTP surface: `/api/*` plus the projection socket
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        // Timer
        .route("/timer/command", post(timer::command))
        .route("/timer/state", get(timer::get_state))
        .route("/timer/initialize", post(timer::initialize))
        // Media
        .route("/media/command", post(media::command))
        .route("/media/state", get(media::get_state))
        // Projection
        .route("/projection/message", post(projection::send_message))
        .route("/projection/batch", post(projection::send_batch))
        .route("/projection/resync", post(projection::resync))
        .route("/projection/state", get(projection::get_state));

    Router::new()
        .nest("/api", api_routes)
        .route("/ws/projection", get(ws::projection_socket))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
