//! WebSocket projection windows
//!
//! Every socket on `/ws/projection` becomes a [`Window`] registered with the
//! timer, media, and projection registries. Outgoing frames are bare
//! `AppMessage` JSON; a writer task drains a bounded queue so a slow socket
//! never blocks a broadcast.

use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use lectern_core::{AppMessage, SystemEvent, TransportError, Window, WindowId};
use lectern_projection::requests_resync;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const OUTBOUND_QUEUE: usize = 256;

/// A projection window connected over WebSocket
#[derive(Debug)]
pub struct WsWindow {
    id: WindowId,
    tx: mpsc::Sender<Message>,
    closed: AtomicBool,
}

impl WsWindow {
    pub fn new(id: WindowId, tx: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            tx,
            closed: AtomicBool::new(false),
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl Window for WsWindow {
    fn id(&self) -> WindowId {
        self.id.clone()
    }

    fn is_destroyed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.tx.is_closed()
    }

    fn send(&self, channel: &str, message: &AppMessage) -> Result<(), TransportError> {
        let text = serde_json::to_string(message)?;
        self.tx.try_send(Message::Text(text)).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                TransportError::Send(format!("outbound queue full on {channel}"))
            }
            mpsc::error::TrySendError::Closed(_) => {
                TransportError::WindowDestroyed(self.id.to_string())
            }
        })
    }
}

/// GET /ws/projection - Projection window socket
pub async fn projection_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);

    let write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                return;
            }
        }
    });

    let window = Arc::new(WsWindow::new(WindowId::generate(), tx));
    state.register_window(window.clone());
    info!(window_id = %window.id(), "Projection window connected");

    while let Some(result) = ws_receiver.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!(window_id = %window.id(), error = %e, "Projection socket read error");
                break;
            }
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => continue,
        };

        match serde_json::from_str::<AppMessage>(&text) {
            Ok(message) if requests_resync(&message) => {
                debug!(window_id = %window.id(), "Projection window requested resync");
                state.resync_window(window.as_ref()).await;
            }
            Ok(AppMessage::System(data)) if data.event == SystemEvent::WindowClosed => break,
            Ok(message) => {
                debug!(
                    window_id = %window.id(),
                    message_type = %message.message_type(),
                    "Ignoring message from projection window"
                );
            }
            Err(e) => debug!(window_id = %window.id(), error = %e, "Unparsable projection frame"),
        }
    }

    window.close();
    state.unregister_window(&window.id());
    write_task.abort();
    info!(window_id = %window.id(), "Projection window disconnected");
}
