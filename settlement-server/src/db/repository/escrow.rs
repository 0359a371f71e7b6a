//! Escrow Account Repository
//!
//! 托管账户表访问。状态转换一律走 `apply_mutation` 的条件更新：
//! `UPDATE ... WHERE escrow_id = $id AND state = $expected`，
//! 前置条件检查与状态写入在同一条语句内原子完成。

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::escrow::{EscrowAccount, EscrowMutation, EscrowState};

use super::{BaseRepository, RepoError, RepoResult};

/// SurrealDB escrow_account record
///
/// Mirrors [`EscrowAccount`] with the account id under `escrow_id`
/// (the bare `id` field name is reserved for SurrealDB record ids).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowRow {
    pub escrow_id: String,
    pub order_id: String,
    pub buyer_id: String,
    pub supplier_id: String,
    pub amount: f64,
    pub currency: String,
    pub state: EscrowState,
    pub created_at: i64,
    pub expires_at: i64,
    pub funded_at: Option<i64>,
    pub released_at: Option<i64>,
    pub refunded_at: Option<i64>,
    pub qc_passed: Option<bool>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub refund_reason: Option<String>,
}

impl From<&EscrowAccount> for EscrowRow {
    fn from(a: &EscrowAccount) -> Self {
        Self {
            escrow_id: a.id.clone(),
            order_id: a.order_id.clone(),
            buyer_id: a.buyer_id.clone(),
            supplier_id: a.supplier_id.clone(),
            amount: a.amount,
            currency: a.currency.clone(),
            state: a.state,
            created_at: a.created_at,
            expires_at: a.expires_at,
            funded_at: a.funded_at,
            released_at: a.released_at,
            refunded_at: a.refunded_at,
            qc_passed: a.qc_passed,
            payment_method: a.payment_method.clone(),
            transaction_id: a.transaction_id.clone(),
            refund_reason: a.refund_reason.clone(),
        }
    }
}

impl From<EscrowRow> for EscrowAccount {
    fn from(r: EscrowRow) -> Self {
        Self {
            id: r.escrow_id,
            order_id: r.order_id,
            buyer_id: r.buyer_id,
            supplier_id: r.supplier_id,
            amount: r.amount,
            currency: r.currency,
            state: r.state,
            created_at: r.created_at,
            expires_at: r.expires_at,
            funded_at: r.funded_at,
            released_at: r.released_at,
            refunded_at: r.refunded_at,
            qc_passed: r.qc_passed,
            payment_method: r.payment_method,
            transaction_id: r.transaction_id,
            refund_reason: r.refund_reason,
        }
    }
}

#[derive(Clone)]
pub struct EscrowRepository {
    base: BaseRepository,
}

impl EscrowRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a freshly created account
    ///
    /// The unique index on `order_id` enforces one account per order;
    /// a violation comes back as [`RepoError::Duplicate`].
    pub async fn create(&self, account: &EscrowAccount) -> RepoResult<()> {
        let row = EscrowRow::from(account);
        let mut result = self
            .base
            .db()
            .query("CREATE escrow_account CONTENT $data")
            .bind(("data", row))
            .await?;
        // index violations are reported per-statement, not at send time
        let created: Vec<EscrowRow> = result.take(0).map_err(|e| {
            let repo_err = RepoError::from(e);
            if let RepoError::Duplicate(_) = repo_err {
                RepoError::Duplicate(account.order_id.clone())
            } else {
                repo_err
            }
        })?;
        if created.is_empty() {
            return Err(RepoError::Database(
                "escrow_account create returned no record".to_string(),
            ));
        }
        Ok(())
    }

    /// Fetch one account by escrow id
    pub async fn find_by_id(&self, escrow_id: &str) -> RepoResult<Option<EscrowAccount>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM escrow_account WHERE escrow_id = $escrow_id")
            .bind(("escrow_id", escrow_id.to_string()))
            .await?;
        let rows: Vec<EscrowRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(EscrowAccount::from))
    }

    /// Fetch the account owning an order
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Option<EscrowAccount>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM escrow_account WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .await?;
        let rows: Vec<EscrowRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(EscrowAccount::from))
    }

    /// Conditionally apply a state transition
    ///
    /// Returns the updated account, or `None` when the guard matched no
    /// row (wrong state or unknown id - the caller distinguishes by
    /// re-reading).
    pub async fn apply_mutation(
        &self,
        escrow_id: &str,
        expected: EscrowState,
        mutation: &EscrowMutation,
    ) -> RepoResult<Option<EscrowAccount>> {
        let mut result = match mutation {
            EscrowMutation::Fund {
                payment_method,
                transaction_id,
                funded_at,
            } => {
                self.base
                    .db()
                    .query(
                        r#"
                        UPDATE escrow_account SET
                            state          = $next,
                            payment_method = $payment_method,
                            transaction_id = $transaction_id,
                            funded_at      = $funded_at
                        WHERE escrow_id = $escrow_id AND state = $expected
                        RETURN AFTER
                        "#,
                    )
                    .bind(("escrow_id", escrow_id.to_string()))
                    .bind(("expected", expected))
                    .bind(("next", mutation.target_state()))
                    .bind(("payment_method", payment_method.clone()))
                    .bind(("transaction_id", transaction_id.clone()))
                    .bind(("funded_at", *funded_at))
                    .await?
            }
            EscrowMutation::Release {
                qc_passed,
                released_at,
            } => {
                self.base
                    .db()
                    .query(
                        r#"
                        UPDATE escrow_account SET
                            state       = $next,
                            qc_passed   = $qc_passed,
                            released_at = $released_at
                        WHERE escrow_id = $escrow_id AND state = $expected
                        RETURN AFTER
                        "#,
                    )
                    .bind(("escrow_id", escrow_id.to_string()))
                    .bind(("expected", expected))
                    .bind(("next", mutation.target_state()))
                    .bind(("qc_passed", *qc_passed))
                    .bind(("released_at", *released_at))
                    .await?
            }
            EscrowMutation::Refund {
                reason,
                refunded_at,
            } => {
                self.base
                    .db()
                    .query(
                        r#"
                        UPDATE escrow_account SET
                            state         = $next,
                            refund_reason = $reason,
                            refunded_at   = $refunded_at
                        WHERE escrow_id = $escrow_id AND state = $expected
                        RETURN AFTER
                        "#,
                    )
                    .bind(("escrow_id", escrow_id.to_string()))
                    .bind(("expected", expected))
                    .bind(("next", mutation.target_state()))
                    .bind(("reason", reason.clone()))
                    .bind(("refunded_at", *refunded_at))
                    .await?
            }
        };
        let rows: Vec<EscrowRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(EscrowAccount::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::escrow::CreateEscrowInput;

    async fn repo() -> EscrowRepository {
        let service = DbService::memory().await.unwrap();
        EscrowRepository::new(service.db)
    }

    fn pending_account(order_id: &str) -> EscrowAccount {
        crate::escrow::machine::create(
            &CreateEscrowInput {
                order_id: order_id.to_string(),
                buyer_id: "buyer-1".to_string(),
                supplier_id: "sup-1".to_string(),
                amount: 1000.0,
                currency: "INR".to_string(),
            },
            1_000,
            30,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_roundtrip() {
        let repo = repo().await;
        let account = pending_account("o1");
        repo.create(&account).await.unwrap();

        let fetched = repo.find_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(fetched, account);

        let by_order = repo.find_by_order("o1").await.unwrap().unwrap();
        assert_eq!(by_order.id, account.id);

        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_guarded_update_wins_once() {
        let repo = repo().await;
        let account = pending_account("o1");
        repo.create(&account).await.unwrap();

        let mutation = EscrowMutation::Fund {
            payment_method: "upi".to_string(),
            transaction_id: "txn1".to_string(),
            funded_at: 2_000,
        };
        let updated = repo
            .apply_mutation(&account.id, EscrowState::Pending, &mutation)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.state, EscrowState::Funded);
        assert_eq!(updated.funded_at, Some(2_000));

        // guard no longer matches: the statement touches nothing
        let second = repo
            .apply_mutation(&account.id, EscrowState::Pending, &mutation)
            .await
            .unwrap();
        assert!(second.is_none());
        let stored = repo.find_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(stored.state, EscrowState::Funded);
    }
}
