//! Window registry
//!
//! Tracks which display windows are alive and should receive broadcasts.
//! Each state machine owns its own registry instance; the same window may be
//! registered with several of them at once.
//!
//! Destroyed windows are only skipped at broadcast time. Removal is explicit
//! and driven by the window's "closed" event.

use crate::error::TransportError;
use crate::types::AppMessage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Window identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    /// Create a window ID from an existing label
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random window ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a renderer process that can receive broadcasts
#[cfg_attr(test, mockall::automock)]
pub trait Window: Send + Sync {
    /// Stable identity used for idempotent registration
    fn id(&self) -> WindowId;

    /// Liveness predicate, checked immediately before every send
    fn is_destroyed(&self) -> bool;

    /// Deliver one message on a named channel
    fn send(&self, channel: &str, message: &AppMessage) -> Result<(), TransportError>;
}

/// Set of broadcast targets for one state machine
///
/// Cheap to clone; clones share the same set.
#[derive(Clone, Default)]
pub struct WindowRegistry {
    windows: Arc<RwLock<Vec<Arc<dyn Window>>>>,
}

impl WindowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window to the broadcast set (no-op if already registered)
    pub fn register(&self, window: Arc<dyn Window>) {
        let id = window.id();
        let mut windows = self.windows.write().unwrap_or_else(PoisonError::into_inner);

        if windows.iter().any(|w| w.id() == id) {
            debug!(window_id = %id, "Window already registered");
            return;
        }

        debug!(window_id = %id, "Registering window");
        windows.push(window);
    }

    /// Remove a window from the broadcast set
    ///
    /// Returns true if the window was registered.
    pub fn unregister(&self, id: &WindowId) -> bool {
        let mut windows = self.windows.write().unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|w| &w.id() != id);

        let removed = windows.len() != before;
        if removed {
            debug!(window_id = %id, "Unregistered window");
        }
        removed
    }

    /// Fan a message out to every live window
    ///
    /// Destroyed windows are skipped and per-window failures are logged; neither
    /// aborts delivery to the remaining windows. Returns the number of windows
    /// the message was delivered to.
    pub fn broadcast(&self, channel: &str, message: &AppMessage) -> usize {
        // Snapshot the targets so sends never run under the lock
        let targets: Vec<Arc<dyn Window>> = self
            .windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut delivered = 0;
        for window in targets {
            if window.is_destroyed() {
                debug!(window_id = %window.id(), channel, "Skipping destroyed window");
                continue;
            }

            match window.send(channel, message) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(
                        operation = "broadcast",
                        window_id = %window.id(),
                        channel,
                        message_type = %message.message_type(),
                        error = %e,
                        "Failed to deliver broadcast"
                    );
                }
            }
        }

        delivered
    }

    /// Check whether a window is registered
    pub fn contains(&self, id: &WindowId) -> bool {
        self.windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|w| &w.id() == id)
    }

    /// Number of registered windows (including destroyed, not yet unregistered ones)
    pub fn len(&self) -> usize {
        self.windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check whether no window is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRegistry")
            .field("windows", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels;
    use crate::types::ProjectionView;

    fn mock_window(id: &str, destroyed: bool, expected_sends: usize) -> MockWindow {
        let mut window = MockWindow::new();
        let id = WindowId::new(id);
        window.expect_id().return_const(id);
        window.expect_is_destroyed().return_const(destroyed);
        window
            .expect_send()
            .times(expected_sends)
            .returning(|_, _| Ok(()));
        window
    }

    fn message() -> AppMessage {
        AppMessage::view_change(ProjectionView::Timer)
    }

    #[test]
    fn register_is_idempotent() {
        let registry = WindowRegistry::new();
        let window: Arc<dyn Window> = Arc::new(mock_window("projection", false, 1));

        registry.register(Arc::clone(&window));
        registry.register(Arc::clone(&window));
        assert_eq!(registry.len(), 1);

        // Registered once, so delivered once
        assert_eq!(registry.broadcast(channels::PROJECTION_MESSAGE, &message()), 1);
    }

    #[test]
    fn broadcast_skips_destroyed_windows() {
        let registry = WindowRegistry::new();
        registry.register(Arc::new(mock_window("alive", false, 1)));
        registry.register(Arc::new(mock_window("dead", true, 0)));

        let delivered = registry.broadcast(channels::TIMER_TICK, &message());
        assert_eq!(delivered, 1);
        // Destroyed windows are pruned by the caller, not by broadcast
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn failing_window_does_not_abort_fan_out() {
        let registry = WindowRegistry::new();

        let mut failing = MockWindow::new();
        failing.expect_id().return_const(WindowId::new("failing"));
        failing.expect_is_destroyed().return_const(false);
        failing
            .expect_send()
            .times(1)
            .returning(|_, _| Err(TransportError::Send("pipe broken".to_string())));

        registry.register(Arc::new(failing));
        registry.register(Arc::new(mock_window("healthy", false, 1)));

        assert_eq!(registry.broadcast(channels::MEDIA_UPDATE, &message()), 1);
    }

    #[test]
    fn unregister_removes_window() {
        let registry = WindowRegistry::new();
        registry.register(Arc::new(mock_window("projection", false, 0)));

        let id = WindowId::new("projection");
        assert!(registry.contains(&id));
        assert!(registry.unregister(&id));
        assert!(!registry.unregister(&id));
        assert!(registry.is_empty());
        assert_eq!(registry.broadcast(channels::TIMER_UPDATE, &message()), 0);
    }

    #[test]
    fn clones_share_the_same_set() {
        let registry = WindowRegistry::new();
        let clone = registry.clone();
        clone.register(Arc::new(mock_window("projection", false, 0)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn independent_registries_do_not_share_windows() {
        let timer = WindowRegistry::new();
        let media = WindowRegistry::new();
        timer.register(Arc::new(mock_window("projection", false, 0)));
        assert!(media.is_empty());
    }
}
