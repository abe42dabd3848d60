/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use lectern_console::{api, AppState, ConsoleConfig, PersistedSettings, SettingsStore};
use lectern_core::{AppMessage, ManualClock, TransportError, Window, WindowId};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const START_MS: i64 = 1_700_000_000_000;

/// Build state backed by a manual clock and a temporary settings file
pub fn create_test_state(persisted: &PersistedSettings) -> (AppState, ManualClock, TempDir) {
    let temp_dir = TempDir::new().unwrap();

    let mut config = ConsoleConfig::default();
    config.settings.path = temp_dir.path().join("settings.json");
    config.projection.window_ready_timeout_ms = 50;

    let store = SettingsStore::new(config.settings.path.clone());
    let clock = ManualClock::new(START_MS);
    let state = AppState::new(config, Arc::new(clock.clone()), store, persisted);

    (state, clock, temp_dir)
}

/// Router over fresh state
pub fn create_test_app() -> (Router, AppState, ManualClock, TempDir) {
    let (state, clock, temp_dir) = create_test_state(&PersistedSettings::default());
    (api::create_router(state.clone()), state, clock, temp_dir)
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Window recording every delivery as (channel, message)
pub struct RecordingWindow {
    id: WindowId,
    received: Mutex<Vec<(String, AppMessage)>>,
}

impl RecordingWindow {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: WindowId::new(id),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn received(&self) -> Vec<(String, AppMessage)> {
        self.received.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.received.lock().unwrap().clear();
    }
}

impl Window for RecordingWindow {
    fn id(&self) -> WindowId {
        self.id.clone()
    }

    fn is_destroyed(&self) -> bool {
        false
    }

    fn send(&self, channel: &str, message: &AppMessage) -> Result<(), TransportError> {
        self.received
            .lock()
            .unwrap()
            .push((channel.to_string(), message.clone()));
        Ok(())
    }
}
