//! WebSocket handler for the realtime pairing channel
//!
//! Frames are JSON text. Each connection gets a fresh identifier and an
//! unbounded event channel; a spawned writer task pumps queued server
//! events out while the reader loop decodes client events and hands them
//! to the dispatch table in `crate::relay`.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use pulselink_core::models::ConnectionId;
use pulselink_relay::{ClientEvent, ServerEvent};

use crate::http::AppState;
use crate::relay;

/// WebSocket upgrade handler
pub async fn websocket_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    // Signaling frames are tiny; the default 64MB cap is excessive
    ws.max_message_size(16 * 1024)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = ConnectionId::new();
    info!(connection_id = %connection_id, "WebSocket connection established");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ServerEvent>();
    let (mut sink, mut stream) = socket.split();

    // Writer task: queued server events -> JSON text frames
    let writer_id = connection_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!(connection_id = %writer_id, error = %e, "Failed to encode server event");
                    continue;
                }
            };
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Reader loop: decode client events and dispatch
    while let Some(frame) = stream.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
        };

        match message {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => relay::dispatch(event, &connection_id, &tx, &state).await,
                // The channel carries no error events; malformed frames are dropped
                Err(e) => {
                    debug!(connection_id = %connection_id, error = %e, "Ignoring unparseable frame");
                }
            },
            Message::Close(_) => {
                info!(connection_id = %connection_id, "Client requested close");
                break;
            }
            // Ping/pong is answered by the protocol layer; binary frames
            // are not part of this channel
            _ => {}
        }
    }

    // The disconnect signal fires here, before the writer task is torn
    // down; membership is removed first so the presence fan-out below
    // never counts the departing connection.
    relay::disconnect(&connection_id, &state);

    send_task.abort();
    info!(connection_id = %connection_id, "WebSocket connection closed");
}
