//! In-memory ledger store
//!
//! DashMap-backed fake with the same atomicity contract as the SurrealDB
//! implementation: `conditional_update` holds the account's shard write
//! lock across the precondition check and the mutation, so concurrent
//! transitions on one account serialize and exactly one wins. Used by
//! unit/integration tests and local development.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;

use shared::escrow::{EscrowAccount, EscrowMutation, EscrowState};
use shared::models::SupplierMetrics;

use super::{LedgerError, LedgerResult, LedgerStore, SettlementOutcome, apply_outcome};

/// In-memory ledger store
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    escrows: DashMap<String, EscrowAccount>,
    /// order_id -> escrow_id (enforces one account per order)
    by_order: DashMap<String, String>,
    suppliers: DashMap<String, SupplierMetrics>,
    ranks: DashMap<String, i64>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get_escrow(&self, escrow_id: &str) -> LedgerResult<EscrowAccount> {
        self.escrows
            .get(escrow_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| LedgerError::NotFound(escrow_id.to_string()))
    }

    async fn find_escrow_by_order(&self, order_id: &str) -> LedgerResult<Option<EscrowAccount>> {
        match self.by_order.get(order_id) {
            Some(escrow_id) => Ok(self.escrows.get(escrow_id.value()).map(|e| e.value().clone())),
            None => Ok(None),
        }
    }

    async fn insert_escrow(&self, account: &EscrowAccount) -> LedgerResult<()> {
        // entry() holds the shard lock, so two concurrent creates for the
        // same order cannot both pass the vacancy check
        match self.by_order.entry(account.order_id.clone()) {
            dashmap::Entry::Occupied(_) => {
                return Err(LedgerError::Duplicate(account.order_id.clone()));
            }
            dashmap::Entry::Vacant(slot) => {
                slot.insert(account.id.clone());
            }
        }
        self.escrows.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn conditional_update(
        &self,
        escrow_id: &str,
        expected: EscrowState,
        mutation: &EscrowMutation,
    ) -> LedgerResult<EscrowAccount> {
        let mut entry = self
            .escrows
            .get_mut(escrow_id)
            .ok_or_else(|| LedgerError::NotFound(escrow_id.to_string()))?;
        if entry.state != expected {
            return Err(LedgerError::Conflict {
                escrow_id: escrow_id.to_string(),
                actual: entry.state,
            });
        }
        mutation.apply(entry.value_mut());
        Ok(entry.value().clone())
    }

    async fn get_supplier_metrics(&self, supplier_id: &str) -> LedgerResult<SupplierMetrics> {
        self.suppliers
            .get(supplier_id)
            .map(|m| m.value().clone())
            .ok_or_else(|| LedgerError::NotFound(supplier_id.to_string()))
    }

    async fn upsert_supplier_metrics(&self, metrics: &SupplierMetrics) -> LedgerResult<()> {
        self.suppliers
            .insert(metrics.supplier_id.clone(), metrics.clone());
        Ok(())
    }

    async fn apply_settlement_outcome(
        &self,
        supplier_id: &str,
        outcome: SettlementOutcome,
    ) -> LedgerResult<SupplierMetrics> {
        let mut entry = self
            .suppliers
            .get_mut(supplier_id)
            .ok_or_else(|| LedgerError::NotFound(supplier_id.to_string()))?;
        apply_outcome(entry.value_mut(), outcome);
        Ok(entry.value().clone())
    }

    async fn list_supplier_metrics(&self) -> LedgerResult<Vec<SupplierMetrics>> {
        Ok(self.suppliers.iter().map(|m| m.value().clone()).collect())
    }

    async fn previous_ranks(&self) -> LedgerResult<HashMap<String, i64>> {
        Ok(self
            .ranks
            .iter()
            .map(|r| (r.key().clone(), *r.value()))
            .collect())
    }

    async fn store_ranks(&self, ranks: &[(String, i64)]) -> LedgerResult<()> {
        for (supplier_id, rank) in ranks {
            self.ranks.insert(supplier_id.clone(), *rank);
        }
        Ok(())
    }
}
