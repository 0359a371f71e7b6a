//! Settlement events - immutable facts recorded after a state transition
//!
//! Each successful escrow transition produces exactly one event. The
//! settlement orchestrator consumes events to drive notification fan-out
//! and to tell the surrounding order flow about payment status changes.

use serde::{Deserialize, Serialize};

use crate::util::now_millis;

/// Settlement event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementEvent {
    /// Event unique ID
    pub event_id: String,
    /// Escrow account this event belongs to
    pub escrow_id: String,
    /// Owning order (for the surrounding order flow)
    pub order_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Event type
    pub event_type: SettlementEventType,
    /// Event payload
    pub payload: SettlementPayload,
}

impl SettlementEvent {
    pub fn new(
        escrow_id: impl Into<String>,
        order_id: impl Into<String>,
        event_type: SettlementEventType,
        payload: SettlementPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            escrow_id: escrow_id.into(),
            order_id: order_id.into(),
            timestamp: now_millis(),
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementEventType {
    /// Account created in Pending
    EscrowCreated,
    /// Buyer funds captured and held in trust
    FundsEscrowed,
    /// Funds released to the supplier
    FundsReleased,
    /// QC failed, account frozen in Disputed
    EscrowDisputed,
    /// Funds returned to the buyer
    FundsRefunded,
}

impl std::fmt::Display for SettlementEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementEventType::EscrowCreated => write!(f, "ESCROW_CREATED"),
            SettlementEventType::FundsEscrowed => write!(f, "FUNDS_ESCROWED"),
            SettlementEventType::FundsReleased => write!(f, "FUNDS_RELEASED"),
            SettlementEventType::EscrowDisputed => write!(f, "ESCROW_DISPUTED"),
            SettlementEventType::FundsRefunded => write!(f, "FUNDS_REFUNDED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementPayload {
    EscrowCreated {
        amount: f64,
        currency: String,
        expires_at: i64,
    },
    FundsEscrowed {
        payment_method: String,
        transaction_id: String,
        /// Payment status the owning order should take on ("PAID")
        order_payment_status: String,
    },
    FundsReleased {
        qc_passed: bool,
    },
    EscrowDisputed {
        qc_passed: bool,
    },
    FundsRefunded {
        reason: String,
    },
}
