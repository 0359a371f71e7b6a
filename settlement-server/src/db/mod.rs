//! Database Module
//!
//! Embedded SurrealDB storage for escrow accounts, supplier metrics and
//! persisted leaderboard ranks. Table access goes through the repository
//! layer; the settlement core consumes it behind [`SurrealLedgerStore`].

pub mod ledger;
pub mod repository;

pub use ledger::SurrealLedgerStore;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use shared::error::AppError;

/// Namespace / database the settlement engine lives in
const NAMESPACE: &str = "mandi";
const DATABASE: &str = "settlement";

/// Schema: tables plus the unique indexes the conditional-write contract
/// leans on (one account per order, one metrics row per supplier)
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS escrow_account SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_escrow_account_id ON TABLE escrow_account COLUMNS escrow_id UNIQUE;
    DEFINE INDEX IF NOT EXISTS idx_escrow_account_order ON TABLE escrow_account COLUMNS order_id UNIQUE;

    DEFINE TABLE IF NOT EXISTS supplier_metrics SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_supplier_metrics_supplier ON TABLE supplier_metrics COLUMNS supplier_id UNIQUE;

    DEFINE TABLE IF NOT EXISTS leaderboard_rank SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_leaderboard_rank_supplier ON TABLE leaderboard_rank COLUMNS supplier_id UNIQUE;
"#;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database under the work directory (RocksDB backend)
    pub async fn new(work_dir: &str) -> Result<Self, AppError> {
        let data_dir = Path::new(work_dir).join("data");
        let db: Surreal<Db> = Surreal::new::<RocksDb>(data_dir.as_path())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self { db };
        service.init().await?;
        tracing::info!(work_dir = %work_dir, "database connection established (SurrealDB RocksDB)");
        Ok(service)
    }

    /// In-memory database for tests and local development
    pub async fn memory() -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        let service = Self { db };
        service.init().await?;
        Ok(service)
    }

    async fn init(&self) -> Result<(), AppError> {
        self.db
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        self.db
            .query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disk_database_opens_and_schema_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let service = DbService::new(tmp.path().to_str().unwrap()).await.unwrap();
        // applying the schema twice must be harmless (IF NOT EXISTS)
        service.init().await.unwrap();
    }
}
