//! CollabBoard WebSocket Relay Server
//!
//! Relays drawing events between clients in the same room. The server keeps no
//! drawing state: a room is just the set of sessions that joined it.
//!
//! ## Protocol
//!
//! Messages are JSON text frames:
//! ```json
//! { "type": "join-room", "roomId": "r0001" }
//! { "type": "drawing", "roomId": "r0001", "data": { "x0": 0, "y0": 0, "x1": 10, "y1": 10, "color": "#000", "size": 3 } }
//! { "type": "clear-canvas", "roomId": "r0001" }
//! ```
//! Other members receive `{ "type": "drawing", "data": ... }` and
//! `{ "type": "clear-canvas" }`. The sender never gets its own events back.

pub mod config;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod relay;

pub use config::Config;
pub use error::ServerError;
pub use relay::RelayEngine;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Build the HTTP router.
pub fn app(relay: Arc<RelayEngine>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ws", get(connection::ws_handler))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// Bind to the configured address and serve until the process is stopped.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind { addr: config.bind, source })?;
    serve(listener, Arc::new(RelayEngine::new(config.peer_queue))).await
}

/// Serve `relay` on an already bound listener.
pub async fn serve(listener: TcpListener, relay: Arc<RelayEngine>) -> Result<(), ServerError> {
    let addr = listener.local_addr().map_err(ServerError::Serve)?;
    info!("CollabBoard relay server listening on {}", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, app(relay))
        .await
        .map_err(ServerError::Serve)
}

/// Index page
async fn index() -> &'static str {
    "CollabBoard Relay Server - Connect via WebSocket at /ws"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}
