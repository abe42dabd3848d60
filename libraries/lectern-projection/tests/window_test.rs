//! Projection window readiness

use lectern_core::{AppMessage, TransportError, Window, WindowId, WindowRegistry};
use lectern_projection::{check_projection_window, ensure_projection_window};
use std::sync::Arc;
use std::time::Duration;

struct NullWindow;

impl Window for NullWindow {
    fn id(&self) -> WindowId {
        WindowId::new("projection-main")
    }

    fn is_destroyed(&self) -> bool {
        false
    }

    fn send(&self, _channel: &str, _message: &AppMessage) -> Result<(), TransportError> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn times_out_without_window() {
    let registry = WindowRegistry::new();
    assert!(!check_projection_window(&registry));
    assert!(!ensure_projection_window(&registry, Duration::from_millis(500)).await);
}

#[tokio::test(start_paused = true)]
async fn returns_once_window_registers() {
    let registry = WindowRegistry::new();
    let late = registry.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        late.register(Arc::new(NullWindow));
    });

    assert!(ensure_projection_window(&registry, Duration::from_millis(500)).await);
    assert!(check_projection_window(&registry));
}
