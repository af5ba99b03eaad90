//! `WebSocket` handler for real-time stats streaming.
//!
//! Clients connect to `GET /ws` and receive a JSON-encoded
//! [`SimulationStats`](storesim_types::SimulationStats) message on every
//! publisher tick. The handler uses a [`broadcast::Receiver`] so all
//! connected clients see the same stream.
//!
//! Clients may send `{"action":"start","data":{"customerCount":N}}` to
//! admit N generated customers. Admission runs on its own task so a full
//! intake queue never stalls the stream.
//!
//! [`broadcast::Receiver`]: tokio::sync::broadcast::Receiver

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use storesim_core::population;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// A command sent by the browser.
#[derive(Debug, serde::Deserialize)]
pub struct ClientMessage {
    /// Command name. Only `"start"` is recognised.
    pub action: String,
    /// Command payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of the `start` command.
#[derive(Debug, serde::Deserialize)]
pub struct StartData {
    /// Number of customers to generate.
    #[serde(rename = "customerCount")]
    pub customer_count: u32,
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming stats snapshots.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_stats(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: forward every stats snapshot as a
/// text frame and act on client commands.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(stats) => {
                        let json = match serde_json::to_string(&stats) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize stats snapshot: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Text(text))) => handle_command(&state, text.as_str()),
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Parse and run one client command. Malformed commands are logged and
/// ignored.
fn handle_command(state: &Arc<AppState>, text: &str) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed WebSocket message");
            return;
        }
    };

    if message.action != "start" {
        debug!(action = %message.action, "Ignoring unknown WebSocket action");
        return;
    }

    let start: StartData = match serde_json::from_value(message.data) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed start payload");
            return;
        }
    };

    info!(customer_count = start.customer_count, "Starting simulation from WebSocket");
    let store = Arc::clone(&state.store);
    tokio::spawn(async move {
        if let Err(e) = population::admit_random(&store, start.customer_count).await {
            warn!(error = %e, "Simulation start stopped early");
        }
    });
}
