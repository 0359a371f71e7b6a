//! Supplier Scoring API Module
//!
//! Read-only access to derived supplier signals: trust score, badge
//! progress, the full snapshot, and the leaderboard. Safe to call
//! repeatedly - everything is recomputed on demand.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Supplier scoring router
pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/suppliers", routes())
        .route("/api/leaderboard", get(handler::leaderboard))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/trust-score", get(handler::trust_score))
        .route("/{id}/badges", get(handler::badges))
        .route("/{id}/snapshot", get(handler::snapshot))
}
