//! Repository Module
//!
//! Table-level access to SurrealDB. All escrow mutations go through the
//! guarded update in [`EscrowRepository::apply_mutation`]; nothing else
//! writes escrow state.

pub mod escrow;
pub mod leaderboard;
pub mod supplier;

pub use escrow::EscrowRepository;
pub use leaderboard::LeaderboardRepository;
pub use supplier::SupplierRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // unique index violations surface as a generic error string
        if msg.to_lowercase().contains("index") && msg.to_lowercase().contains("already") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
