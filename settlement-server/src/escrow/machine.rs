//! Escrow lifecycle transitions
//!
//! ```text
//! Pending ──Fund──▶ Funded ──Release(qc ok)──▶ Released
//!                        ├──Release(qc bad)──▶ Disputed
//!                        └──Refund──────────▶ Refunded
//! ```
//!
//! [`check_transition`] is the single source of legality: every operation
//! goes through it and no other code inspects the transition table. Expiry
//! (`expires_at` reached while still Pending) is a read-time observation,
//! never a self-transition.

use shared::escrow::{CreateEscrowInput, EscrowAccount, EscrowMutation, EscrowState};
use shared::util::days_millis;
use uuid::Uuid;

use super::money;
use super::{EscrowError, EscrowResult};
use crate::utils::validation::{validate_currency, validate_required_id, validate_text};

/// Operations a caller can attempt against an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowOp {
    Fund,
    Release,
    Refund,
}

impl std::fmt::Display for EscrowOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscrowOp::Fund => write!(f, "FUND"),
            EscrowOp::Release => write!(f, "RELEASE"),
            EscrowOp::Refund => write!(f, "REFUND"),
        }
    }
}

/// The transition table - the only place legality is decided
///
/// Terminal states (`Released`, `Disputed`, `Refunded`) admit nothing;
/// recovery from them is an explicit operator-level operation outside
/// this core, never an implicit retry.
pub fn check_transition(current: EscrowState, op: EscrowOp) -> EscrowResult<()> {
    let legal = matches!(
        (current, op),
        (EscrowState::Pending, EscrowOp::Fund)
            | (EscrowState::Funded, EscrowOp::Release)
            | (EscrowState::Funded, EscrowOp::Refund)
    );
    if legal {
        Ok(())
    } else {
        Err(EscrowError::InvalidStateTransition { from: current, op })
    }
}

/// Build a new escrow account in `Pending`
///
/// Validates amount, currency and party references. Persistence (and the
/// one-account-per-order guarantee) belongs to the ledger store.
pub fn create(input: &CreateEscrowInput, now: i64, expiry_days: i64) -> EscrowResult<EscrowAccount> {
    money::validate_amount(input.amount)?;
    validate_currency(&input.currency)?;
    validate_required_id(&input.order_id, "order_id")?;
    validate_required_id(&input.buyer_id, "buyer_id")?;
    validate_required_id(&input.supplier_id, "supplier_id")?;

    Ok(EscrowAccount {
        id: Uuid::new_v4().to_string(),
        order_id: input.order_id.clone(),
        buyer_id: input.buyer_id.clone(),
        supplier_id: input.supplier_id.clone(),
        amount: input.amount,
        currency: input.currency.to_ascii_uppercase(),
        state: EscrowState::Pending,
        created_at: now,
        expires_at: now + days_millis(expiry_days),
        funded_at: None,
        released_at: None,
        refunded_at: None,
        qc_passed: None,
        payment_method: None,
        transaction_id: None,
        refund_reason: None,
    })
}

/// Validate a funding attempt and produce its mutation
///
/// Requires `Pending`. A failed precondition is reported, not retried -
/// funding must never be silently reattempted with a stale account.
pub fn fund(
    account: &EscrowAccount,
    payment_method: &str,
    transaction_id: &str,
    now: i64,
) -> EscrowResult<EscrowMutation> {
    check_transition(account.state, EscrowOp::Fund)?;
    validate_required_id(payment_method, "payment_method")?;
    validate_required_id(transaction_id, "transaction_id")?;

    Ok(EscrowMutation::Fund {
        payment_method: payment_method.to_string(),
        transaction_id: transaction_id.to_string(),
        funded_at: now,
    })
}

/// Validate a release attempt and produce its mutation
///
/// Requires `Funded`. This is the single atomic decision point: the QC
/// outcome is supplied by the external QC subsystem and trusted as-is.
/// `qc_passed` sends the account to `Released`, otherwise to `Disputed`;
/// both branches set `released_at`.
pub fn release(account: &EscrowAccount, qc_passed: bool, now: i64) -> EscrowResult<EscrowMutation> {
    check_transition(account.state, EscrowOp::Release)?;

    Ok(EscrowMutation::Release {
        qc_passed,
        released_at: now,
    })
}

/// Validate a refund attempt and produce its mutation
///
/// Requires `Funded` (direct refund of a funded-but-undelivered order).
/// The reason is stored for the audit trail and must be non-empty.
pub fn refund(account: &EscrowAccount, reason: &str, now: i64) -> EscrowResult<EscrowMutation> {
    check_transition(account.state, EscrowOp::Refund)?;
    if reason.trim().is_empty() {
        return Err(EscrowError::EmptyRefundReason);
    }
    validate_text(reason, "reason")?;

    Ok(EscrowMutation::Refund {
        reason: reason.trim().to_string(),
        refunded_at: now,
    })
}

/// Read-time expiry observation
///
/// True when the account is still `Pending` past its `expires_at`. The
/// state machine never self-transitions on a timer; the surrounding order
/// flow decides whether to cancel.
pub fn is_expired(account: &EscrowAccount, now: i64) -> bool {
    account.state == EscrowState::Pending && now >= account.expires_at
}
