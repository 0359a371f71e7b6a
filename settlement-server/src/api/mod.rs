//! HTTP API surface
//!
//! Thin axum adapters over the settlement core. The core itself is
//! transport-agnostic; these routes exist so the surrounding CRUD layer
//! can call it over HTTP/JSON.

pub mod escrow;
pub mod health;
pub mod suppliers;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full API router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(escrow::router())
        .merge(suppliers::router())
}
