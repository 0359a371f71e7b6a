//! Supplier Scoring API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use shared::error::AppResult;
use shared::models::SupplierMetricsSnapshot;

use crate::core::ServerState;
use crate::gamification::{BadgeProgress, LeaderboardEntry};

/// Trust score response
#[derive(Debug, Serialize)]
pub struct TrustScoreResponse {
    pub supplier_id: String,
    pub trust_score: f64,
}

/// Query params for the leaderboard
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Trust score for one supplier
pub async fn trust_score(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TrustScoreResponse>> {
    let trust_score = state.orchestrator.compute_trust_score(&id).await?;
    Ok(Json(TrustScoreResponse {
        supplier_id: id,
        trust_score,
    }))
}

/// Badge + progress report for one supplier
pub async fn badges(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BadgeProgress>>> {
    let report = state.orchestrator.compute_badges(&id).await?;
    Ok(Json(report))
}

/// Full derived snapshot for one supplier
pub async fn snapshot(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SupplierMetricsSnapshot>> {
    let snapshot = state.orchestrator.compute_snapshot(&id).await?;
    Ok(Json(snapshot))
}

/// Ranked leaderboard of verified suppliers
pub async fn leaderboard(
    State(state): State<ServerState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<Vec<LeaderboardEntry>>> {
    let entries = state.orchestrator.compute_leaderboard(query.limit).await?;
    Ok(Json(entries))
}
