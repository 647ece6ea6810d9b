//! Parakeet server
//!
//! The transport shell around the turn pipeline: an axum application with a
//! WebSocket audio endpoint and health probes. Each connection gets its own
//! session and pipeline; the pipeline never surfaces an error to the
//! socket, only empty bytes.

pub mod http;
pub mod state;
pub mod websocket;

pub use http::create_router;
pub use state::AppState;

use thiserror::Error;

/// Server startup errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Store error: {0}")]
    Store(#[from] parakeet_store::StoreError),
}
