//! Supplier Metrics Repository
//!
//! One row per supplier. Settlement outcomes move the counters inside a
//! single multi-statement query (one transaction), with the derived
//! completion/dispute rates recomputed from the stored counts.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::models::SupplierMetrics;

use crate::ledger::SettlementOutcome;

use super::{BaseRepository, RepoError, RepoResult};

/// Rate recompute applied after any counter movement
const RECOMPUTE_RATES: &str = r#"
    UPDATE supplier_metrics SET
        completion_rate = IF total_orders > 0 THEN completed_orders * 100.0 / total_orders ELSE 0.0 END,
        dispute_rate    = IF total_orders > 0 THEN disputed_orders * 100.0 / total_orders ELSE 0.0 END
    WHERE supplier_id = $supplier_id
    RETURN AFTER
"#;

#[derive(Clone)]
pub struct SupplierRepository {
    base: BaseRepository,
}

impl SupplierRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Fetch one supplier's metrics row
    pub async fn find_by_supplier(
        &self,
        supplier_id: &str,
    ) -> RepoResult<Option<SupplierMetrics>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM supplier_metrics WHERE supplier_id = $supplier_id")
            .bind(("supplier_id", supplier_id.to_string()))
            .await?;
        let rows: Vec<SupplierMetrics> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// All metrics rows (leaderboard input)
    pub async fn find_all(&self) -> RepoResult<Vec<SupplierMetrics>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM supplier_metrics")
            .await?;
        let rows: Vec<SupplierMetrics> = result.take(0)?;
        Ok(rows)
    }

    /// Create or replace a supplier's row
    pub async fn upsert(&self, metrics: &SupplierMetrics) -> RepoResult<()> {
        let mut result = self
            .base
            .db()
            .query("UPDATE supplier_metrics CONTENT $data WHERE supplier_id = $supplier_id RETURN AFTER")
            .bind(("supplier_id", metrics.supplier_id.clone()))
            .bind(("data", metrics.clone()))
            .await?;
        let updated: Vec<SupplierMetrics> = result.take(0)?;
        if updated.is_empty() {
            self.base
                .db()
                .query("CREATE supplier_metrics CONTENT $data")
                .bind(("data", metrics.clone()))
                .await?
                .take::<Vec<SupplierMetrics>>(0)?;
        }
        Ok(())
    }

    /// Move the counters for one settlement outcome
    ///
    /// Counter increment and rate recompute run as two statements in one
    /// query call, which SurrealDB executes in a single transaction.
    pub async fn apply_outcome(
        &self,
        supplier_id: &str,
        outcome: SettlementOutcome,
    ) -> RepoResult<SupplierMetrics> {
        let increment = match outcome {
            SettlementOutcome::Completed => {
                r#"
                UPDATE supplier_metrics SET
                    completed_orders += 1,
                    qc_clean_streak  += 1
                WHERE supplier_id = $supplier_id
                "#
            }
            SettlementOutcome::Disputed => {
                r#"
                UPDATE supplier_metrics SET
                    disputed_orders += 1,
                    qc_clean_streak  = 0
                WHERE supplier_id = $supplier_id
                "#
            }
            SettlementOutcome::Refunded => {
                r#"
                UPDATE supplier_metrics SET
                    cancelled_orders += 1
                WHERE supplier_id = $supplier_id
                "#
            }
        };
        let query = format!("{increment};\n{RECOMPUTE_RATES}");
        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("supplier_id", supplier_id.to_string()))
            .await?;
        let rows: Vec<SupplierMetrics> = result.take(1)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(supplier_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> SupplierRepository {
        let service = DbService::memory().await.unwrap();
        SupplierRepository::new(service.db)
    }

    fn seeded(supplier_id: &str) -> SupplierMetrics {
        let mut m = SupplierMetrics::empty(supplier_id, 0);
        m.total_orders = 10;
        m.rating = 4.0;
        m.verified = true;
        m
    }

    #[tokio::test]
    async fn test_upsert_and_fetch() {
        let repo = repo().await;
        let metrics = seeded("sup-1");
        repo.upsert(&metrics).await.unwrap();

        let fetched = repo.find_by_supplier("sup-1").await.unwrap().unwrap();
        assert_eq!(fetched, metrics);

        // replace in place, no second row
        let mut updated = metrics.clone();
        updated.rating = 4.5;
        repo.upsert(&updated).await.unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
        let fetched = repo.find_by_supplier("sup-1").await.unwrap().unwrap();
        assert_eq!(fetched.rating, 4.5);
    }

    #[tokio::test]
    async fn test_apply_outcome_moves_counters_and_rates() {
        let repo = repo().await;
        repo.upsert(&seeded("sup-1")).await.unwrap();

        let after = repo
            .apply_outcome("sup-1", SettlementOutcome::Completed)
            .await
            .unwrap();
        assert_eq!(after.completed_orders, 1);
        assert_eq!(after.qc_clean_streak, 1);
        assert_eq!(after.completion_rate, 10.0);

        let after = repo
            .apply_outcome("sup-1", SettlementOutcome::Disputed)
            .await
            .unwrap();
        assert_eq!(after.disputed_orders, 1);
        assert_eq!(after.qc_clean_streak, 0);
        assert_eq!(after.dispute_rate, 10.0);
    }

    #[tokio::test]
    async fn test_apply_outcome_unknown_supplier() {
        let repo = repo().await;
        assert!(matches!(
            repo.apply_outcome("missing", SettlementOutcome::Completed)
                .await,
            Err(RepoError::NotFound(_))
        ));
    }
}
