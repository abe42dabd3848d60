//! Transports
//!
//! A [`Transport`] moves one [`AppMessage`] across the process boundary.
//! The control process normally talks IPC ([`ChannelTransport`] in process,
//! [`RegistryTransport`] to every projection window). Contexts without IPC
//! fall back to a same-origin `postMessage` bus, where the receiver drops
//! anything stamped with a foreign origin.

use lectern_core::{channels, AppMessage, TransportError, WindowRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, trace};

/// Sends messages to the projection side
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Deliver one message
    fn send(&self, message: &AppMessage) -> Result<(), TransportError>;

    /// Whether this transport can currently deliver
    fn is_available(&self) -> bool {
        true
    }
}

// ===== IPC =====

/// In-process IPC channel
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<AppMessage>,
}

impl ChannelTransport {
    /// Create a transport and the receiving end
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AppMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: &AppMessage) -> Result<(), TransportError> {
        self.tx
            .send(message.clone())
            .map_err(|_| TransportError::ChannelClosed(channels::PROJECTION_MESSAGE.to_string()))
    }

    fn is_available(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Fans messages out to every window in a registry on `projection:message`
#[derive(Debug, Clone)]
pub struct RegistryTransport {
    registry: WindowRegistry,
}

impl RegistryTransport {
    pub fn new(registry: WindowRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }
}

impl Transport for RegistryTransport {
    fn send(&self, message: &AppMessage) -> Result<(), TransportError> {
        let delivered = self
            .registry
            .broadcast(channels::PROJECTION_MESSAGE, message);
        trace!(
            message_type = %message.message_type(),
            delivered,
            "Projection message fanned out"
        );
        Ok(())
    }
}

// ===== postMessage Fallback =====

/// A message as posted on the fallback bus, stamped with its sender's origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginEnvelope {
    pub origin: String,
    pub message: AppMessage,
}

/// Shared same-device message bus standing in for `window.postMessage`
#[derive(Debug, Clone)]
pub struct PostMessageBus {
    tx: broadcast::Sender<OriginEnvelope>,
}

impl PostMessageBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Sender stamping every message with `origin`
    pub fn transport(&self, origin: impl Into<String>) -> PostMessageTransport {
        PostMessageTransport {
            origin: origin.into(),
            tx: self.tx.clone(),
        }
    }

    /// Receiver accepting only messages from `origin`
    pub fn receiver(&self, origin: impl Into<String>) -> PostMessageReceiver {
        PostMessageReceiver {
            origin: origin.into(),
            rx: self.tx.subscribe(),
        }
    }

    /// Post a pre-built envelope, origin and all
    pub fn post(&self, envelope: OriginEnvelope) {
        let _ = self.tx.send(envelope);
    }
}

impl Default for PostMessageBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Fallback sender
#[derive(Debug, Clone)]
pub struct PostMessageTransport {
    origin: String,
    tx: broadcast::Sender<OriginEnvelope>,
}

impl PostMessageTransport {
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl Transport for PostMessageTransport {
    fn send(&self, message: &AppMessage) -> Result<(), TransportError> {
        let envelope = OriginEnvelope {
            origin: self.origin.clone(),
            message: message.clone(),
        };
        // Posting with nobody listening is not an error
        let _ = self.tx.send(envelope);
        Ok(())
    }
}

/// Fallback receiver
#[derive(Debug)]
pub struct PostMessageReceiver {
    origin: String,
    rx: broadcast::Receiver<OriginEnvelope>,
}

impl PostMessageReceiver {
    /// Unwrap an envelope if it came from our own origin
    pub fn accept(&self, envelope: OriginEnvelope) -> Option<AppMessage> {
        if envelope.origin == self.origin {
            Some(envelope.message)
        } else {
            debug!(origin = %envelope.origin, "Dropping cross-origin message");
            None
        }
    }

    /// Next same-origin message; `None` once the bus is gone
    pub async fn recv(&mut self) -> Option<AppMessage> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) => {
                    if let Some(message) = self.accept(envelope) {
                        return Some(message);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "postMessage receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

// ===== Selection =====

/// IPC when available, the `postMessage` fallback otherwise
#[derive(Clone)]
pub struct ProjectionTransport {
    ipc: Option<Arc<dyn Transport>>,
    fallback: Arc<dyn Transport>,
}

impl ProjectionTransport {
    pub fn new(ipc: Option<Arc<dyn Transport>>, fallback: Arc<dyn Transport>) -> Self {
        Self { ipc, fallback }
    }

    /// Whether the next send goes over IPC
    pub fn uses_ipc(&self) -> bool {
        self.ipc.as_ref().is_some_and(|t| t.is_available())
    }
}

impl Transport for ProjectionTransport {
    fn send(&self, message: &AppMessage) -> Result<(), TransportError> {
        match &self.ipc {
            Some(ipc) if ipc.is_available() => ipc.send(message),
            _ => self.fallback.send(message),
        }
    }

    fn is_available(&self) -> bool {
        self.uses_ipc() || self.fallback.is_available()
    }
}
