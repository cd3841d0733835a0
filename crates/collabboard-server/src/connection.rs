//! WebSocket connection handling.

use crate::protocol::ClientMessage;
use crate::relay::RelayEngine;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(relay): State<Arc<RelayEngine>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

/// Drive one connection until the client goes away.
///
/// Inbound frames are handled one at a time, to completion. Forwards queued by other
/// sessions are written out in the order they were queued.
pub async fn handle_socket(socket: WebSocket, relay: Arc<RelayEngine>) {
    let (session, mut outbound) = relay.open_session();
    info!("User connected: {}", session.id);

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => relay.dispatch(&session, client_msg),
                            Err(e) => debug!("Dropping malformed message from {}: {}", session.id, e),
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        debug!("Dropping binary frame from {}", session.id);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // Ping/pong are answered by axum
                    Some(Err(e)) => {
                        warn!("WebSocket error for {}: {}", session.id, e);
                        break;
                    }
                }
            }

            Some(server_msg) = outbound.recv() => {
                let json = match serde_json::to_string(&server_msg) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to encode message for {}: {}", session.id, e);
                        continue;
                    }
                };
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    relay.disconnect(session.id);
    info!("User disconnected: {}", session.id);
}
