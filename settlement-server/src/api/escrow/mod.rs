//! Escrow API Module
//!
//! Create/fund/release/refund escrow accounts plus read-only queries.
//! Every write maps 1:1 onto one orchestrated state transition.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Escrow router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/escrow", post(handler::create))
        .nest("/api/escrow", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/fund", post(handler::fund))
        .route("/{id}/release", post(handler::release))
        .route("/{id}/refund", post(handler::refund))
        .route("/{id}/expiry", get(handler::check_expiry))
        .route("/order/{order_id}", get(handler::get_by_order))
}
