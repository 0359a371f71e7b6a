//! Ledger Store - durable keyed storage for escrow accounts and supplier
//! metrics
//!
//! The settlement core consumes storage through this narrow trait so the
//! orchestrator and state machine stay testable against the in-memory
//! fake. The production implementation lives in [`crate::db`] on embedded
//! SurrealDB.
//!
//! The one capability that matters for correctness is
//! [`LedgerStore::conditional_update`]: precondition check and state write
//! are a single atomic operation, so of two concurrent transitions on the
//! same account exactly one wins and the loser observes a conflict.

pub mod memory;

pub use memory::MemoryLedgerStore;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use shared::escrow::{EscrowAccount, EscrowMutation, EscrowState};
use shared::models::SupplierMetrics;

/// Ledger store errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {escrow_id} is {actual}, precondition failed")]
    Conflict {
        escrow_id: String,
        actual: EscrowState,
    },

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Settlement outcome applied to the supplier's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// QC-passed release
    Completed,
    /// QC-failed release
    Disputed,
    /// Refund before delivery
    Refunded,
}

/// Apply one settlement outcome to a metrics row
///
/// Shared by both store implementations so the counter math cannot drift:
/// order counts move, `qc_clean_streak` advances or resets, and the
/// completion/dispute rates are recomputed from the counts.
pub fn apply_outcome(m: &mut SupplierMetrics, outcome: SettlementOutcome) {
    match outcome {
        SettlementOutcome::Completed => {
            m.completed_orders += 1;
            m.qc_clean_streak += 1;
        }
        SettlementOutcome::Disputed => {
            m.disputed_orders += 1;
            m.qc_clean_streak = 0;
        }
        SettlementOutcome::Refunded => {
            m.cancelled_orders += 1;
        }
    }
    if m.total_orders > 0 {
        m.completion_rate = m.completed_orders as f64 * 100.0 / m.total_orders as f64;
        m.dispute_rate = m.disputed_orders as f64 * 100.0 / m.total_orders as f64;
    } else {
        m.completion_rate = 0.0;
        m.dispute_rate = 0.0;
    }
}

/// Narrow repository interface over the relational store
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Fetch one escrow account
    async fn get_escrow(&self, escrow_id: &str) -> LedgerResult<EscrowAccount>;

    /// Fetch the escrow account owning an order, if any
    async fn find_escrow_by_order(&self, order_id: &str) -> LedgerResult<Option<EscrowAccount>>;

    /// Persist a new account; `Duplicate` if the order already has one
    async fn insert_escrow(&self, account: &EscrowAccount) -> LedgerResult<()>;

    /// Atomically apply `mutation` iff the account is in `expected` state
    ///
    /// Exactly one of two concurrent callers succeeds; the loser receives
    /// [`LedgerError::Conflict`] carrying the state it actually observed.
    async fn conditional_update(
        &self,
        escrow_id: &str,
        expected: EscrowState,
        mutation: &EscrowMutation,
    ) -> LedgerResult<EscrowAccount>;

    /// Fetch a supplier's metrics row
    async fn get_supplier_metrics(&self, supplier_id: &str) -> LedgerResult<SupplierMetrics>;

    /// Create or replace a supplier's metrics row
    async fn upsert_supplier_metrics(&self, metrics: &SupplierMetrics) -> LedgerResult<()>;

    /// Apply a settlement outcome to the supplier's counters
    async fn apply_settlement_outcome(
        &self,
        supplier_id: &str,
        outcome: SettlementOutcome,
    ) -> LedgerResult<SupplierMetrics>;

    /// All supplier metrics rows (leaderboard input)
    async fn list_supplier_metrics(&self) -> LedgerResult<Vec<SupplierMetrics>>;

    /// Previously persisted leaderboard ranks, supplier_id -> rank
    async fn previous_ranks(&self) -> LedgerResult<HashMap<String, i64>>;

    /// Persist the freshly computed ranks (full set, not a page)
    async fn store_ranks(&self, ranks: &[(String, i64)]) -> LedgerResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_outcome_counters_and_rates() {
        let mut m = SupplierMetrics::empty("sup-1", 0);
        m.total_orders = 10;

        apply_outcome(&mut m, SettlementOutcome::Completed);
        assert_eq!(m.completed_orders, 1);
        assert_eq!(m.qc_clean_streak, 1);
        assert_eq!(m.completion_rate, 10.0);

        apply_outcome(&mut m, SettlementOutcome::Disputed);
        assert_eq!(m.disputed_orders, 1);
        assert_eq!(m.qc_clean_streak, 0, "dispute resets the clean streak");
        assert_eq!(m.dispute_rate, 10.0);

        apply_outcome(&mut m, SettlementOutcome::Refunded);
        assert_eq!(m.cancelled_orders, 1);
    }

    #[test]
    fn test_apply_outcome_zero_orders_keeps_rates_zero() {
        let mut m = SupplierMetrics::empty("sup-1", 0);
        apply_outcome(&mut m, SettlementOutcome::Completed);
        assert_eq!(m.completion_rate, 0.0);
        assert_eq!(m.dispute_rate, 0.0);
    }
}
