//! Gamification Engine - badges, points, tiers, leaderboard
//!
//! Pure functions mapping a supplier's metrics to unlocked badges, point
//! totals, a tier and a leaderboard rank. Composes with the Trust Score
//! Engine's inputs; nothing here performs I/O or draws randomness.

pub mod badges;
pub mod leaderboard;

pub use badges::{BADGE_CATALOG, BadgeProgress, badge_progress_report, catalog, progress};
pub use leaderboard::{LeaderboardEntry, rank_suppliers};

use shared::models::{SupplierMetrics, SupplierMetricsSnapshot, SupplierTier};

use crate::trust;

/// Tier thresholds (points)
const TIER_PLATINUM: i64 = 10_000;
const TIER_GOLD: i64 = 5_000;
const TIER_SILVER: i64 = 2_000;

/// Volume-based points, independent of badges:
/// `totalOrders × 10 + rating × 20 + (200 if verified) + responseTimeBonus`
pub fn volume_points(m: &SupplierMetrics) -> i64 {
    let orders = m.total_orders.max(0) * 10;
    let rating = (m.rating * 20.0).round() as i64;
    let verified = if m.verified { 200 } else { 0 };
    orders + rating + verified + response_time_bonus(m.average_response_time_hours)
}

/// +100 below 2h average response, +50 below 6h, else nothing
fn response_time_bonus(avg_response_hours: f64) -> i64 {
    if avg_response_hours < 2.0 {
        100
    } else if avg_response_hours < 6.0 {
        50
    } else {
        0
    }
}

/// Total points: unlocked badge points plus volume-based points
pub fn total_points(m: &SupplierMetrics, now: i64) -> i64 {
    let badge_points: i64 = badges::unlocked_badges(m, now)
        .iter()
        .map(|b| b.points)
        .sum();
    badge_points + volume_points(m)
}

/// Tier from points: platinum ≥ 10000, gold ≥ 5000, silver ≥ 2000
pub fn tier(points: i64) -> SupplierTier {
    if points >= TIER_PLATINUM {
        SupplierTier::Platinum
    } else if points >= TIER_GOLD {
        SupplierTier::Gold
    } else if points >= TIER_SILVER {
        SupplierTier::Silver
    } else {
        SupplierTier::Bronze
    }
}

/// Assemble the full derived view of a supplier
///
/// This is the only place the trust score and the gamification outputs
/// are combined; it is recomputed on demand and never persisted as the
/// source of truth.
pub fn build_snapshot(metrics: SupplierMetrics, now: i64) -> SupplierMetricsSnapshot {
    let trust_score = trust::trust_score(&metrics);
    let unlocked_badge_ids = badges::unlocked_badges(&metrics, now)
        .iter()
        .map(|b| b.id.to_string())
        .collect();
    let points = total_points(&metrics, now);
    SupplierMetricsSnapshot {
        trust_score,
        unlocked_badge_ids,
        points,
        tier: tier(points),
        metrics,
    }
}
