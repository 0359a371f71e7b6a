//! Settlement Orchestrator
//!
//! The only component with side effects. Sequences a single escrow state
//! transition with its required side effects as one logical unit:
//!
//! ```text
//! fund/release/refund(escrow_id, ...)
//!     ├─ 1. Load account (fast-fail on NotFound / illegal state)
//!     ├─ 2. Validate via the state machine, producing the mutation
//!     ├─ 3. Conditional ledger update (atomic precondition + write)
//!     ├─ 4. Apply supplier counter deltas (release/refund only)
//!     ├─ 5. Notify both parties (fire-and-forget, after persistence)
//!     └─ 6. Return the updated account
//! ```
//!
//! Ordering is fixed: persist before notify. Notification failure is
//! logged inside the sink and never rolled back - the escrow state
//! transition is the durable fact of record. A lost race at step 3
//! surfaces as `InvalidStateTransition`, so callers can tell "someone
//! else won" from "the system is broken".


use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use shared::escrow::{
    CreateEscrowInput, EscrowAccount, SettlementEvent, SettlementEventType, SettlementPayload,
};
use shared::message::NotifyEvent;
use shared::models::SupplierMetricsSnapshot;
use shared::util::now_millis;

use crate::escrow::{self, EscrowError, EscrowOp, EscrowResult, machine};
use crate::gamification::{self, BadgeProgress, LeaderboardEntry};
use crate::ledger::{LedgerError, LedgerStore, SettlementOutcome};
use crate::notify::NotificationSink;
use crate::trust;

/// Payment status the owning order takes on once funds are escrowed
const ORDER_PAYMENT_STATUS_PAID: &str = "PAID";

/// Read-time expiry observation for one account
#[derive(Debug, Clone, Serialize)]
pub struct ExpiryStatus {
    pub escrow_id: String,
    pub expired: bool,
    pub expires_at: i64,
}

/// Settlement orchestrator - explicit dependency injection, no globals
pub struct SettlementOrchestrator {
    ledger: Arc<dyn LedgerStore>,
    notifier: Arc<dyn NotificationSink>,
    expiry_days: i64,
}

impl SettlementOrchestrator {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        notifier: Arc<dyn NotificationSink>,
        expiry_days: i64,
    ) -> Self {
        Self {
            ledger,
            notifier,
            expiry_days,
        }
    }

    // ==================== Write operations ====================

    /// Create an escrow account in `Pending` for an order
    ///
    /// No notification here - the owning order flow notifies separately.
    pub async fn create_escrow(&self, input: &CreateEscrowInput) -> EscrowResult<EscrowAccount> {
        let account = machine::create(input, now_millis(), self.expiry_days)?;
        match self.ledger.insert_escrow(&account).await {
            Ok(()) => {}
            Err(LedgerError::Duplicate(order_id)) => {
                return Err(EscrowError::AlreadyExists(order_id));
            }
            Err(e) => return Err(EscrowError::Dependency(e.to_string())),
        }
        tracing::info!(
            escrow_id = %account.id,
            order_id = %account.order_id,
            amount = account.amount,
            currency = %account.currency,
            "escrow account created"
        );
        Ok(account)
    }

    /// Fund an escrow account: Pending -> Funded
    ///
    /// Emits the FundsEscrowed fact telling the surrounding order flow to
    /// mark the order paid.
    pub async fn fund_escrow(
        &self,
        escrow_id: &str,
        payment_method: &str,
        transaction_id: &str,
    ) -> EscrowResult<EscrowAccount> {
        let account = self.load(escrow_id).await?;
        let mutation = machine::fund(&account, payment_method, transaction_id, now_millis())?;
        let updated = self.apply(escrow_id, &mutation, EscrowOp::Fund).await?;

        let event = SettlementEvent::new(
            &updated.id,
            &updated.order_id,
            SettlementEventType::FundsEscrowed,
            SettlementPayload::FundsEscrowed {
                payment_method: payment_method.to_string(),
                transaction_id: transaction_id.to_string(),
                order_payment_status: ORDER_PAYMENT_STATUS_PAID.to_string(),
            },
        );
        self.fan_out(&updated, NotifyEvent::EscrowFunded, &event).await;
        Ok(updated)
    }

    /// Settle a funded account on the QC outcome: Funded -> Released|Disputed
    ///
    /// The QC outcome is supplied by the external QC subsystem and trusted
    /// as-is. Both branches are the same atomic decision point.
    pub async fn release_escrow(
        &self,
        escrow_id: &str,
        qc_passed: bool,
    ) -> EscrowResult<EscrowAccount> {
        let account = self.load(escrow_id).await?;
        let mutation = machine::release(&account, qc_passed, now_millis())?;
        let updated = self.apply(escrow_id, &mutation, EscrowOp::Release).await?;

        let (outcome, notify_event, event_type, payload) = if qc_passed {
            (
                SettlementOutcome::Completed,
                NotifyEvent::EscrowReleased,
                SettlementEventType::FundsReleased,
                SettlementPayload::FundsReleased { qc_passed },
            )
        } else {
            (
                SettlementOutcome::Disputed,
                NotifyEvent::EscrowDisputed,
                SettlementEventType::EscrowDisputed,
                SettlementPayload::EscrowDisputed { qc_passed },
            )
        };
        self.settle_supplier(&updated, outcome).await?;

        let event = SettlementEvent::new(&updated.id, &updated.order_id, event_type, payload);
        self.fan_out(&updated, notify_event, &event).await;
        Ok(updated)
    }

    /// Refund a funded-but-undelivered order: Funded -> Refunded
    pub async fn refund_escrow(
        &self,
        escrow_id: &str,
        reason: &str,
    ) -> EscrowResult<EscrowAccount> {
        let account = self.load(escrow_id).await?;
        let mutation = machine::refund(&account, reason, now_millis())?;
        let updated = self.apply(escrow_id, &mutation, EscrowOp::Refund).await?;

        self.settle_supplier(&updated, SettlementOutcome::Refunded)
            .await?;

        let event = SettlementEvent::new(
            &updated.id,
            &updated.order_id,
            SettlementEventType::FundsRefunded,
            SettlementPayload::FundsRefunded {
                reason: reason.trim().to_string(),
            },
        );
        self.fan_out(&updated, NotifyEvent::EscrowRefunded, &event).await;
        Ok(updated)
    }

    // ==================== Read operations ====================

    /// Fetch one account
    pub async fn get_escrow(&self, escrow_id: &str) -> EscrowResult<EscrowAccount> {
        self.load(escrow_id).await
    }

    /// Read-time expiry observation - never a self-transition
    pub async fn check_expiry(&self, escrow_id: &str) -> EscrowResult<ExpiryStatus> {
        let account = self.load(escrow_id).await?;
        Ok(ExpiryStatus {
            expired: escrow::is_expired(&account, now_millis()),
            expires_at: account.expires_at,
            escrow_id: account.id,
        })
    }

    /// Trust score for one supplier
    pub async fn compute_trust_score(&self, supplier_id: &str) -> EscrowResult<f64> {
        let metrics = self.supplier_metrics(supplier_id).await?;
        Ok(trust::trust_score(&metrics))
    }

    /// Badge + progress report for one supplier
    pub async fn compute_badges(&self, supplier_id: &str) -> EscrowResult<Vec<BadgeProgress>> {
        let metrics = self.supplier_metrics(supplier_id).await?;
        Ok(gamification::badge_progress_report(&metrics, now_millis()))
    }

    /// Full derived view (trust score, badges, points, tier)
    pub async fn compute_snapshot(
        &self,
        supplier_id: &str,
    ) -> EscrowResult<SupplierMetricsSnapshot> {
        let metrics = self.supplier_metrics(supplier_id).await?;
        Ok(gamification::build_snapshot(metrics, now_millis()))
    }

    /// Ranked leaderboard, top `limit` entries
    ///
    /// Ranks for the FULL eligible set are persisted so the next
    /// computation reports a real movement delta for every supplier.
    pub async fn compute_leaderboard(&self, limit: usize) -> EscrowResult<Vec<LeaderboardEntry>> {
        let rows = self
            .ledger
            .list_supplier_metrics()
            .await
            .map_err(|e| EscrowError::Dependency(e.to_string()))?;
        let previous = self
            .ledger
            .previous_ranks()
            .await
            .map_err(|e| EscrowError::Dependency(e.to_string()))?;

        let mut ranked = gamification::rank_suppliers(rows, &previous, now_millis());

        let rank_set: Vec<(String, i64)> = ranked
            .iter()
            .map(|e| (e.supplier_id.clone(), e.rank))
            .collect();
        self.ledger
            .store_ranks(&rank_set)
            .await
            .map_err(|e| EscrowError::Dependency(e.to_string()))?;

        ranked.truncate(limit);
        Ok(ranked)
    }

    // ==================== Internal helpers ====================

    async fn load(&self, escrow_id: &str) -> EscrowResult<EscrowAccount> {
        match self.ledger.get_escrow(escrow_id).await {
            Ok(account) => Ok(account),
            Err(LedgerError::NotFound(id)) => Err(EscrowError::NotFound(id)),
            Err(e) => Err(EscrowError::Dependency(e.to_string())),
        }
    }

    async fn supplier_metrics(
        &self,
        supplier_id: &str,
    ) -> EscrowResult<shared::models::SupplierMetrics> {
        match self.ledger.get_supplier_metrics(supplier_id).await {
            Ok(metrics) => Ok(metrics),
            Err(LedgerError::NotFound(id)) => Err(EscrowError::SupplierNotFound(id)),
            Err(e) => Err(EscrowError::Dependency(e.to_string())),
        }
    }

    /// Conditional ledger update; a lost race comes back as
    /// `InvalidStateTransition` with the state the loser actually observed
    async fn apply(
        &self,
        escrow_id: &str,
        mutation: &shared::escrow::EscrowMutation,
        op: EscrowOp,
    ) -> EscrowResult<EscrowAccount> {
        let updated = self
            .ledger
            .conditional_update(escrow_id, mutation.expected_state(), mutation)
            .await
            .map_err(|e| map_ledger_error(e, op))?;
        tracing::info!(
            escrow_id = %updated.id,
            order_id = %updated.order_id,
            state = %updated.state,
            operation = %op,
            "escrow transition committed"
        );
        Ok(updated)
    }

    /// Recompute and persist the supplier counters this transition changed
    ///
    /// The full trust score stays lazy; only counts and derived rates move
    /// here. Failure is surfaced (the transition itself already committed,
    /// the caller must know the metrics write did not).
    async fn settle_supplier(
        &self,
        account: &EscrowAccount,
        outcome: SettlementOutcome,
    ) -> EscrowResult<()> {
        match self
            .ledger
            .apply_settlement_outcome(&account.supplier_id, outcome)
            .await
        {
            Ok(metrics) => {
                tracing::debug!(
                    supplier_id = %metrics.supplier_id,
                    completed = metrics.completed_orders,
                    disputed = metrics.disputed_orders,
                    cancelled = metrics.cancelled_orders,
                    "supplier counters updated"
                );
                Ok(())
            }
            Err(LedgerError::NotFound(id)) => Err(EscrowError::SupplierNotFound(id)),
            Err(e) => {
                tracing::error!(
                    escrow_id = %account.id,
                    supplier_id = %account.supplier_id,
                    error = %e,
                    "supplier counter update failed after committed transition"
                );
                Err(EscrowError::Dependency(e.to_string()))
            }
        }
    }

    /// Notify both parties after persistence - strictly fire-and-forget
    async fn fan_out(&self, account: &EscrowAccount, event: NotifyEvent, fact: &SettlementEvent) {
        let payload = json!({
            "escrow_id": account.id,
            "order_id": account.order_id,
            "amount": account.amount,
            "currency": account.currency,
            "state": account.state,
            "event": fact,
        });
        self.notifier
            .notify(&account.buyer_id, event, payload.clone())
            .await;
        self.notifier
            .notify(&account.supplier_id, event, payload)
            .await;
    }
}

/// Translate store errors into the caller-visible taxonomy
fn map_ledger_error(err: LedgerError, op: EscrowOp) -> EscrowError {
    match err {
        LedgerError::NotFound(id) => EscrowError::NotFound(id),
        LedgerError::Conflict { actual, .. } => EscrowError::InvalidStateTransition {
            from: actual,
            op,
        },
        LedgerError::Duplicate(id) => EscrowError::AlreadyExists(id),
        LedgerError::Unavailable(msg) => EscrowError::Dependency(msg),
    }
}
