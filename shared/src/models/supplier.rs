//! Supplier performance metrics and the derived scoring snapshot

use serde::{Deserialize, Serialize};

/// Supplier performance metrics
///
/// Source-of-truth counters live on the external Supplier entity and are
/// read through the ledger store. The settlement core owns only the
/// settlement-driven counters (`completed_orders`, `cancelled_orders`,
/// `disputed_orders`, `qc_clean_streak`) and the rates derived from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierMetrics {
    pub supplier_id: String,
    /// Lifetime order count (owned by the external order flow)
    pub total_orders: i64,
    /// Orders settled through a QC-passed release
    pub completed_orders: i64,
    /// Orders refunded before delivery
    pub cancelled_orders: i64,
    /// Orders frozen in dispute
    pub disputed_orders: i64,
    /// Percentage 0-100
    pub on_time_delivery_rate: f64,
    /// Percentage 0-100, derived from disputed_orders / total_orders
    pub dispute_rate: f64,
    /// Percentage 0-100, derived from completed_orders / total_orders
    pub completion_rate: f64,
    /// Average first-response time to an RFQ, in hours
    pub average_response_time_hours: f64,
    /// Buyer rating, 0-5
    pub rating: f64,
    /// Quotes submitted across all RFQs
    pub quotes_submitted: i64,
    /// GST / trade-license verification outcome (mocked upstream)
    pub verified: bool,
    /// Platform join time, Unix milliseconds
    pub joined_at: i64,
    /// Consecutive QC-passed releases with zero defects.
    /// Reset by a disputed release. Backs the qc_success badge.
    pub qc_clean_streak: i64,
    /// Verified share counter (supplied by the social subsystem)
    pub social_shares: i64,
}

impl SupplierMetrics {
    /// Empty metrics row for a supplier with no history
    pub fn empty(supplier_id: impl Into<String>, joined_at: i64) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            total_orders: 0,
            completed_orders: 0,
            cancelled_orders: 0,
            disputed_orders: 0,
            on_time_delivery_rate: 0.0,
            dispute_rate: 0.0,
            completion_rate: 0.0,
            average_response_time_hours: 0.0,
            rating: 0.0,
            quotes_submitted: 0,
            verified: false,
            joined_at,
            qc_clean_streak: 0,
            social_shares: 0,
        }
    }
}

/// Supplier tier, derived from points
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SupplierTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl std::fmt::Display for SupplierTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupplierTier::Bronze => write!(f, "bronze"),
            SupplierTier::Silver => write!(f, "silver"),
            SupplierTier::Gold => write!(f, "gold"),
            SupplierTier::Platinum => write!(f, "platinum"),
        }
    }
}

/// Derived scoring view of a supplier - computed on demand, never the
/// source of truth, cached at most for the duration of one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierMetricsSnapshot {
    pub metrics: SupplierMetrics,
    /// Trust score in [0, 100]
    pub trust_score: f64,
    /// IDs of unlocked badges, catalog order
    pub unlocked_badge_ids: Vec<String>,
    /// Gamification points (non-negative)
    pub points: i64,
    pub tier: SupplierTier,
}
