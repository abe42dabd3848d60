//! Projection window readiness

use lectern_core::WindowRegistry;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Whether any projection window is registered right now
pub fn check_projection_window(registry: &WindowRegistry) -> bool {
    !registry.is_empty()
}

/// Wait up to `timeout` for a projection window to register
///
/// Only the calling task waits; returns whether a window showed up.
pub async fn ensure_projection_window(registry: &WindowRegistry, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;

    loop {
        if check_projection_window(registry) {
            return true;
        }
        if Instant::now() >= deadline {
            warn!(
                timeout_ms = timeout.as_millis() as u64,
                "No projection window registered in time"
            );
            return false;
        }
        sleep(POLL_INTERVAL).await;
        debug!("Waiting for projection window");
    }
}
