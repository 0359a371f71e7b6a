//! Leaderboard ranking
//!
//! A stable, fully deterministic ordering of verified suppliers:
//! rating descending, then total orders descending, ties broken by
//! supplier id ascending so repeated computations are bit-identical.
//! The rank-change indicator is a real delta against the previous
//! computed rank persisted in the ledger - never a display fabrication.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use shared::models::{SupplierMetrics, SupplierTier};

use crate::trust;

/// One leaderboard row
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: i64,
    pub supplier_id: String,
    pub rating: f64,
    pub total_orders: i64,
    pub trust_score: f64,
    pub points: i64,
    pub tier: SupplierTier,
    /// Positive = moved up since the previous computation, 0 on first
    /// appearance
    pub rank_change: i64,
}

/// Rank all eligible suppliers (verified, at least one order)
///
/// Returns the FULL ranked list; the caller truncates for display and
/// persists the complete rank set so the next delta is computed against
/// every supplier, not only the visible page.
pub fn rank_suppliers(
    mut rows: Vec<SupplierMetrics>,
    previous_ranks: &HashMap<String, i64>,
    now: i64,
) -> Vec<LeaderboardEntry> {
    rows.retain(|m| m.verified && m.total_orders > 0);
    rows.sort_by(compare);

    rows.into_iter()
        .enumerate()
        .map(|(idx, m)| {
            let rank = idx as i64 + 1;
            let rank_change = previous_ranks
                .get(&m.supplier_id)
                .map(|prev| prev - rank)
                .unwrap_or(0);
            let points = super::total_points(&m, now);
            LeaderboardEntry {
                rank,
                trust_score: trust::trust_score(&m),
                points,
                tier: super::tier(points),
                rating: m.rating,
                total_orders: m.total_orders,
                supplier_id: m.supplier_id,
                rank_change,
            }
        })
        .collect()
}

/// The total order: rating desc, total_orders desc, supplier_id asc
fn compare(a: &SupplierMetrics, b: &SupplierMetrics) -> Ordering {
    b.rating
        .partial_cmp(&a.rating)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.total_orders.cmp(&a.total_orders))
        .then_with(|| a.supplier_id.cmp(&b.supplier_id))
}
