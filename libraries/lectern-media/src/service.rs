//! Media service
//!
//! Owns the [`MediaMachine`] for the control process and broadcasts every
//! resulting snapshot.

use crate::{error::Result, events::MediaEvent, machine::MediaMachine};
use lectern_core::{MediaCommand, MediaState, WindowRegistry};
use tokio::sync::{broadcast, Mutex};
use tracing::warn;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Authoritative media state owned by the control process
pub struct MediaService {
    machine: Mutex<MediaMachine>,
    registry: WindowRegistry,
    events_tx: broadcast::Sender<MediaEvent>,
}

impl MediaService {
    pub fn new(registry: WindowRegistry) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            machine: Mutex::new(MediaMachine::new()),
            registry,
            events_tx,
        }
    }

    /// Apply a command (fire-and-forget)
    pub async fn command(&self, command: MediaCommand) {
        let mut machine = self.machine.lock().await;
        machine.handle_command(command);

        for event in machine.drain_events() {
            self.registry.broadcast(event.channel(), &event.to_message());
            let _ = self.events_tx.send(event);
        }
    }

    /// Parse and apply a loosely-typed command
    pub async fn command_json(&self, value: serde_json::Value) {
        match parse_command(value) {
            Ok(command) => self.command(command).await,
            Err(e) => warn!(operation = "media_command", error = %e, "Ignoring media command"),
        }
    }

    /// Current snapshot
    pub async fn get_state(&self) -> MediaState {
        self.machine.lock().await.state().clone()
    }

    /// Subscribe to snapshots
    pub fn subscribe(&self) -> broadcast::Receiver<MediaEvent> {
        self.events_tx.subscribe()
    }

    /// Broadcast targets for this machine
    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }
}

/// Parse a wire command
pub fn parse_command(value: serde_json::Value) -> Result<MediaCommand> {
    Ok(serde_json::from_value(value)?)
}
