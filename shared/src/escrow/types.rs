//! Escrow account types
//!
//! An escrow account holds a buyer's funds in trust for exactly one order
//! and walks a strict lifecycle:
//!
//! ```text
//! Pending ──▶ Funded ──▶ Released    (QC passed)
//!                   └──▶ Disputed    (QC failed, terminal here)
//!                   └──▶ Refunded    (funded but undelivered)
//! ```
//!
//! `Released`, `Disputed` and `Refunded` are terminal. Transition legality
//! is enforced centrally by the settlement server's state machine; these
//! types only describe the data.

use serde::{Deserialize, Serialize};

/// Escrow lifecycle state - closed enumeration, no other states exist
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowState {
    /// Created, awaiting buyer funds
    Pending,
    /// Buyer funds held in trust
    Funded,
    /// Funds released to the supplier (QC passed)
    Released,
    /// QC failed, funds frozen pending external resolution
    Disputed,
    /// Funds returned to the buyer
    Refunded,
}

impl EscrowState {
    /// Terminal states admit no further transitions inside this core
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Disputed | Self::Refunded)
    }
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscrowState::Pending => write!(f, "PENDING"),
            EscrowState::Funded => write!(f, "FUNDED"),
            EscrowState::Released => write!(f, "RELEASED"),
            EscrowState::Disputed => write!(f, "DISPUTED"),
            EscrowState::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// Escrow account - 1:1 with the owning order
///
/// Timestamps are Unix milliseconds. `funded_at` / `released_at` /
/// `refunded_at` are each set exactly once, by the transition that
/// produces the corresponding state, and never cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EscrowAccount {
    /// Account ID (UUID v4, generated at creation)
    pub id: String,
    /// Owning order (exactly one escrow account per order)
    pub order_id: String,
    /// Buying party, captured at creation for notification fan-out
    pub buyer_id: String,
    /// Supplying party, captured at creation for metrics recompute
    pub supplier_id: String,
    /// Amount held in trust (validated finite and positive at the boundary)
    pub amount: f64,
    /// ISO-4217 alpha-3 currency code
    pub currency: String,
    /// Current lifecycle state
    pub state: EscrowState,
    /// Creation time
    pub created_at: i64,
    /// Expiry policy: created_at + configured retention window
    pub expires_at: i64,
    /// Set by the Pending -> Funded transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funded_at: Option<i64>,
    /// Set by the Funded -> Released | Disputed transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<i64>,
    /// Set by the Funded -> Refunded transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_at: Option<i64>,
    /// QC outcome, set only on a release/dispute transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc_passed: Option<bool>,
    /// Opaque payment rail reference (set on funding)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Opaque payment rail transaction ID (set on funding)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Stored refund reason (set on refund)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,
}

/// Input for escrow account creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEscrowInput {
    pub order_id: String,
    pub buyer_id: String,
    pub supplier_id: String,
    pub amount: f64,
    pub currency: String,
}

/// A validated state transition, applied atomically by the ledger store
///
/// The mutation carries the full field set its transition writes, so both
/// store implementations apply the same change. The expected (precondition)
/// state and the resulting state are functions of the variant - the store
/// never has to know the transition table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowMutation {
    /// Pending -> Funded
    Fund {
        payment_method: String,
        transaction_id: String,
        funded_at: i64,
    },
    /// Funded -> Released (qc_passed) | Disputed (!qc_passed)
    Release { qc_passed: bool, released_at: i64 },
    /// Funded -> Refunded
    Refund { reason: String, refunded_at: i64 },
}

impl EscrowMutation {
    /// State this mutation requires the account to be in
    pub fn expected_state(&self) -> EscrowState {
        match self {
            EscrowMutation::Fund { .. } => EscrowState::Pending,
            EscrowMutation::Release { .. } | EscrowMutation::Refund { .. } => EscrowState::Funded,
        }
    }

    /// State this mutation produces
    pub fn target_state(&self) -> EscrowState {
        match self {
            EscrowMutation::Fund { .. } => EscrowState::Funded,
            EscrowMutation::Release { qc_passed: true, .. } => EscrowState::Released,
            EscrowMutation::Release { qc_passed: false, .. } => EscrowState::Disputed,
            EscrowMutation::Refund { .. } => EscrowState::Refunded,
        }
    }

    /// Apply this mutation's field writes to an account
    ///
    /// The caller (ledger store) must already hold the account exclusively
    /// and have verified `account.state == self.expected_state()`.
    pub fn apply(&self, account: &mut EscrowAccount) {
        account.state = self.target_state();
        match self {
            EscrowMutation::Fund {
                payment_method,
                transaction_id,
                funded_at,
            } => {
                account.payment_method = Some(payment_method.clone());
                account.transaction_id = Some(transaction_id.clone());
                account.funded_at = Some(*funded_at);
            }
            EscrowMutation::Release {
                qc_passed,
                released_at,
            } => {
                account.qc_passed = Some(*qc_passed);
                account.released_at = Some(*released_at);
            }
            EscrowMutation::Refund {
                reason,
                refunded_at,
            } => {
                account.refund_reason = Some(reason.clone());
                account.refunded_at = Some(*refunded_at);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!EscrowState::Pending.is_terminal());
        assert!(!EscrowState::Funded.is_terminal());
        assert!(EscrowState::Released.is_terminal());
        assert!(EscrowState::Disputed.is_terminal());
        assert!(EscrowState::Refunded.is_terminal());
    }

    #[test]
    fn test_release_target_depends_on_qc() {
        let pass = EscrowMutation::Release {
            qc_passed: true,
            released_at: 1,
        };
        let fail = EscrowMutation::Release {
            qc_passed: false,
            released_at: 1,
        };
        assert_eq!(pass.target_state(), EscrowState::Released);
        assert_eq!(fail.target_state(), EscrowState::Disputed);
        assert_eq!(pass.expected_state(), EscrowState::Funded);
    }

    #[test]
    fn test_state_serde_format() {
        let json = serde_json::to_string(&EscrowState::Funded).unwrap();
        assert_eq!(json, r#""FUNDED""#);
    }
}
