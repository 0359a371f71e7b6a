//! SurrealDB-backed ledger store
//!
//! Production implementation of [`LedgerStore`] composing the repository
//! layer. The conditional-write capability of the store is the only
//! coordination mechanism the settlement core relies on: a guarded
//! `UPDATE` that matched no row while the account exists is a lost race.

use async_trait::async_trait;
use std::collections::HashMap;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::escrow::{EscrowAccount, EscrowMutation, EscrowState};
use shared::models::SupplierMetrics;

use crate::ledger::{LedgerError, LedgerResult, LedgerStore, SettlementOutcome};

use super::repository::{
    EscrowRepository, LeaderboardRepository, RepoError, SupplierRepository,
};

/// Ledger store over embedded SurrealDB
#[derive(Clone)]
pub struct SurrealLedgerStore {
    escrow: EscrowRepository,
    supplier: SupplierRepository,
    leaderboard: LeaderboardRepository,
}

impl SurrealLedgerStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            escrow: EscrowRepository::new(db.clone()),
            supplier: SupplierRepository::new(db.clone()),
            leaderboard: LeaderboardRepository::new(db),
        }
    }
}

fn map_repo_error(err: RepoError) -> LedgerError {
    match err {
        RepoError::NotFound(id) => LedgerError::NotFound(id),
        RepoError::Duplicate(id) => LedgerError::Duplicate(id),
        RepoError::Database(msg) => LedgerError::Unavailable(msg),
    }
}

#[async_trait]
impl LedgerStore for SurrealLedgerStore {
    async fn get_escrow(&self, escrow_id: &str) -> LedgerResult<EscrowAccount> {
        self.escrow
            .find_by_id(escrow_id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| LedgerError::NotFound(escrow_id.to_string()))
    }

    async fn find_escrow_by_order(&self, order_id: &str) -> LedgerResult<Option<EscrowAccount>> {
        self.escrow
            .find_by_order(order_id)
            .await
            .map_err(map_repo_error)
    }

    async fn insert_escrow(&self, account: &EscrowAccount) -> LedgerResult<()> {
        self.escrow.create(account).await.map_err(map_repo_error)
    }

    async fn conditional_update(
        &self,
        escrow_id: &str,
        expected: EscrowState,
        mutation: &EscrowMutation,
    ) -> LedgerResult<EscrowAccount> {
        if let Some(updated) = self
            .escrow
            .apply_mutation(escrow_id, expected, mutation)
            .await
            .map_err(map_repo_error)?
        {
            return Ok(updated);
        }
        // guard matched nothing: distinguish "lost race" from "unknown id"
        match self
            .escrow
            .find_by_id(escrow_id)
            .await
            .map_err(map_repo_error)?
        {
            Some(account) => Err(LedgerError::Conflict {
                escrow_id: escrow_id.to_string(),
                actual: account.state,
            }),
            None => Err(LedgerError::NotFound(escrow_id.to_string())),
        }
    }

    async fn get_supplier_metrics(&self, supplier_id: &str) -> LedgerResult<SupplierMetrics> {
        self.supplier
            .find_by_supplier(supplier_id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| LedgerError::NotFound(supplier_id.to_string()))
    }

    async fn upsert_supplier_metrics(&self, metrics: &SupplierMetrics) -> LedgerResult<()> {
        self.supplier.upsert(metrics).await.map_err(map_repo_error)
    }

    async fn apply_settlement_outcome(
        &self,
        supplier_id: &str,
        outcome: SettlementOutcome,
    ) -> LedgerResult<SupplierMetrics> {
        self.supplier
            .apply_outcome(supplier_id, outcome)
            .await
            .map_err(map_repo_error)
    }

    async fn list_supplier_metrics(&self) -> LedgerResult<Vec<SupplierMetrics>> {
        self.supplier.find_all().await.map_err(map_repo_error)
    }

    async fn previous_ranks(&self) -> LedgerResult<HashMap<String, i64>> {
        let rows = self.leaderboard.find_all().await.map_err(map_repo_error)?;
        Ok(rows.into_iter().map(|r| (r.supplier_id, r.rank)).collect())
    }

    async fn store_ranks(&self, ranks: &[(String, i64)]) -> LedgerResult<()> {
        self.leaderboard.store(ranks).await.map_err(map_repo_error)
    }
}
