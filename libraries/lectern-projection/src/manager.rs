//! Projection message manager
//!
//! Sits between the control window's intents and a [`Transport`]:
//! - **Deduplication** against the last message actually sent
//! - **Debouncing** per key (`type` or `type:action`), trailing edge
//! - **Forced sends** that cancel the key's pending timer and go out now
//! - **Batches** applied in call order under one lock
//! - **Full resync** as a single forced batch

use crate::transport::Transport;
use lectern_core::{AppMessage, ProjectionView, SystemEvent, TimerState};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Default trailing debounce delay
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// The last message that reached the transport
#[derive(Debug, Clone)]
struct SentRecord {
    message: AppMessage,
    value: serde_json::Value,
}

struct PendingSend {
    generation: u64,
    message: AppMessage,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct ManagerState {
    last_sent: Option<SentRecord>,
    pending: HashMap<String, PendingSend>,
    next_generation: u64,
}

impl ManagerState {
    fn is_duplicate(&self, value: &serde_json::Value) -> bool {
        self.last_sent
            .as_ref()
            .is_some_and(|record| &record.value == value)
    }

    fn cancel(&mut self, key: &str) -> bool {
        match self.pending.remove(key) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }
}

struct Inner {
    transport: Arc<dyn Transport>,
    debounce: Duration,
    state: Mutex<ManagerState>,
}

/// Producer-side projection message manager
///
/// Cheap to clone; clones share pending timers and the dedup record.
#[derive(Clone)]
pub struct MessageManager {
    inner: Arc<Inner>,
}

impl MessageManager {
    pub fn new(transport: Arc<dyn Transport>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                debounce,
                state: Mutex::new(ManagerState::default()),
            }),
        }
    }

    // ===== Sending =====

    /// Send one message
    ///
    /// Non-forced messages are deduplicated and debounced; forced ones go out
    /// immediately, cancelling any pending send with the same key.
    pub async fn send(&self, message: AppMessage, force: bool) {
        let mut state = self.inner.state.lock().await;
        self.enqueue(&mut state, message, force);
    }

    /// Send several messages under one lock, in order
    ///
    /// A forced batch reaches the transport back to back with nothing
    /// interleaved.
    pub async fn send_batch(&self, messages: Vec<AppMessage>, force: bool) {
        let mut state = self.inner.state.lock().await;
        for message in messages {
            self.enqueue(&mut state, message, force);
        }
    }

    /// Push the complete observable state as one forced batch
    pub async fn sync_all_states(&self, snapshot: &ResyncSnapshot) {
        let messages = snapshot.to_messages();
        debug!(count = messages.len(), "Full projection resync");
        self.send_batch(messages, true).await;
    }

    fn enqueue(&self, state: &mut ManagerState, message: AppMessage, force: bool) {
        let key = message.debounce_key();

        if force {
            if state.cancel(&key) {
                debug!(key = %key, "Forced send replaced pending send");
            }
            self.inner.deliver(state, message);
            return;
        }

        let value = match serde_json::to_value(&message) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Dropping unencodable projection message");
                return;
            }
        };

        if state.is_duplicate(&value) {
            // A pending send for this key would overwrite the value the
            // projection already shows
            state.cancel(&key);
            debug!(key = %key, "Duplicate projection message suppressed");
            return;
        }

        state.cancel(&key);
        let generation = state.next_generation;
        state.next_generation += 1;

        let inner = Arc::clone(&self.inner);
        let timer_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            inner.fire(&timer_key, generation).await;
        });

        state.pending.insert(
            key,
            PendingSend {
                generation,
                message,
                handle,
            },
        );
    }

    // ===== State Queries =====

    /// Number of debounce timers still waiting
    pub async fn pending_count(&self) -> usize {
        self.inner.state.lock().await.pending.len()
    }

    /// Message that most recently reached the transport
    pub async fn last_sent(&self) -> Option<AppMessage> {
        self.inner
            .state
            .lock()
            .await
            .last_sent
            .as_ref()
            .map(|record| record.message.clone())
    }

    /// Drop every pending send
    pub async fn cancel_all(&self) {
        let mut state = self.inner.state.lock().await;
        let count = state.pending.len();
        for (_, pending) in state.pending.drain() {
            pending.handle.abort();
        }
        if count > 0 {
            debug!(count, "Cancelled pending projection messages");
        }
    }

    pub fn debounce(&self) -> Duration {
        self.inner.debounce
    }
}

impl Inner {
    /// Debounce timer expiry for `key`
    async fn fire(&self, key: &str, generation: u64) {
        let mut state = self.state.lock().await;

        // Superseded or cancelled while waiting for the lock
        let current = state
            .pending
            .get(key)
            .is_some_and(|p| p.generation == generation);
        if !current {
            return;
        }
        let Some(pending) = state.pending.remove(key) else {
            return;
        };

        match serde_json::to_value(&pending.message) {
            Ok(value) if state.is_duplicate(&value) => {
                debug!(key = %key, "Debounced message matches last sent, skipping");
            }
            _ => self.deliver(&mut state, pending.message),
        }
    }

    /// Hand a message to the transport
    ///
    /// Failures are logged and absorbed; only successful sends update the
    /// dedup record.
    fn deliver(&self, state: &mut ManagerState, message: AppMessage) {
        match self.transport.send(&message) {
            Ok(()) => match serde_json::to_value(&message) {
                Ok(value) => state.last_sent = Some(SentRecord { message, value }),
                Err(e) => warn!(error = %e, "Sent message could not be recorded"),
            },
            Err(e) => {
                error!(
                    operation = "projection_send",
                    message_type = %message.message_type(),
                    error = %e,
                    "Projection send failed"
                );
            }
        }
    }
}

// ===== Resync =====

/// Complete observable state pushed to a fresh projection window
#[derive(Debug, Clone, PartialEq)]
pub struct ResyncSnapshot {
    pub timer: Option<TimerState>,
    pub view: ProjectionView,
    pub content_visible: bool,
    pub locale: String,
    pub font_size: u32,
    pub theme: String,
}

impl ResyncSnapshot {
    /// Messages in resync order
    pub fn to_messages(&self) -> Vec<AppMessage> {
        let mut messages = Vec::with_capacity(6);
        if let Some(timer) = &self.timer {
            messages.push(AppMessage::TimerSettingsSync(timer.clone()));
        }
        messages.push(AppMessage::view_change(self.view));
        messages.push(AppMessage::content_toggle(self.content_visible));
        messages.push(AppMessage::locale(self.locale.clone()));
        messages.push(AppMessage::font_size(self.font_size));
        messages.push(AppMessage::theme(self.theme.clone()));
        messages
    }
}

/// Whether a message from a projection window asks for a full resync
pub fn requests_resync(message: &AppMessage) -> bool {
    matches!(
        message,
        AppMessage::System(data)
            if matches!(data.event, SystemEvent::ResyncRequest | SystemEvent::FinishedLoading)
    )
}
