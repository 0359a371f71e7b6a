//! Leaderboard Rank Repository
//!
//! Persists the rank each supplier held after the latest leaderboard
//! computation, so the next computation reports a real movement delta
//! instead of a fabricated one.

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::util::now_millis;

use super::{BaseRepository, RepoResult};

/// SurrealDB leaderboard_rank record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRow {
    pub supplier_id: String,
    pub rank: i64,
    pub computed_at: i64,
}

#[derive(Clone)]
pub struct LeaderboardRepository {
    base: BaseRepository,
}

impl LeaderboardRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All persisted ranks
    pub async fn find_all(&self) -> RepoResult<Vec<RankRow>> {
        let mut result = self.base.db().query("SELECT * FROM leaderboard_rank").await?;
        let rows: Vec<RankRow> = result.take(0)?;
        Ok(rows)
    }

    /// Persist the freshly computed rank set
    pub async fn store(&self, ranks: &[(String, i64)]) -> RepoResult<()> {
        let computed_at = now_millis();
        for (supplier_id, rank) in ranks {
            let row = RankRow {
                supplier_id: supplier_id.clone(),
                rank: *rank,
                computed_at,
            };
            let mut result = self
                .base
                .db()
                .query("UPDATE leaderboard_rank CONTENT $data WHERE supplier_id = $supplier_id RETURN AFTER")
                .bind(("supplier_id", supplier_id.clone()))
                .bind(("data", row.clone()))
                .await?;
            let updated: Vec<RankRow> = result.take(0)?;
            if updated.is_empty() {
                self.base
                    .db()
                    .query("CREATE leaderboard_rank CONTENT $data")
                    .bind(("data", row))
                    .await?
                    .take::<Vec<RankRow>>(0)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_store_overwrites_previous_ranks() {
        let service = DbService::memory().await.unwrap();
        let repo = LeaderboardRepository::new(service.db);

        repo.store(&[("sup-a".to_string(), 1), ("sup-b".to_string(), 2)])
            .await
            .unwrap();
        repo.store(&[("sup-a".to_string(), 2), ("sup-b".to_string(), 1)])
            .await
            .unwrap();

        let mut rows = repo.find_all().await.unwrap();
        rows.sort_by(|a, b| a.supplier_id.cmp(&b.supplier_id));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 2);
        assert_eq!(rows[1].rank, 1);
    }
}
