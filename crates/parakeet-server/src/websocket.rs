//! WebSocket audio endpoint
//!
//! The caller sends binary frames over one long-lived connection: the
//! literal `ping` probe, answered with the literal `pong`, or an audio
//! payload, answered with the synthesized reply bytes (empty on any
//! pipeline failure). Frames are processed strictly in receipt order.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};

use crate::state::AppState;

/// Handle the WebSocket upgrade
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one connection until it closes
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let session_id = state.connection_session_id();
    let pipeline = state.pipeline_for_session(&session_id);

    tracing::info!(%session_id, "WebSocket connection established, ready to receive audio");

    while let Some(message) = socket.recv().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(%session_id, error = %e, "WebSocket receive error");
                break;
            }
        };

        match message {
            Message::Binary(data) => {
                if data.as_slice() == b"ping" {
                    tracing::debug!(%session_id, "Received ping, sending pong");
                    if socket.send(Message::Binary(b"pong".to_vec())).await.is_err() {
                        break;
                    }
                    continue;
                }

                tracing::debug!(%session_id, bytes = data.len(), "Received audio frame");
                let reply = pipeline.process(&data).await;
                if socket.send(Message::Binary(reply)).await.is_err() {
                    break;
                }
            }
            Message::Ping(payload) => {
                if socket.send(Message::Pong(payload)).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    tracing::info!(%session_id, "WebSocket connection closed");
}
