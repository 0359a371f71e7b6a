//! Notification messages
//!
//! The settlement core treats notification delivery as a fire-and-forget
//! side effect: messages are published on a broadcast bus and the
//! transport (WhatsApp/SMS/in-app, owned by the surrounding system) drains
//! them. A failed publish is logged and counted, never surfaced to the
//! caller - the escrow state change is the durable fact of record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::now_millis;

/// Notification event kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotifyEvent {
    EscrowFunded,
    EscrowReleased,
    EscrowDisputed,
    EscrowRefunded,
}

impl std::fmt::Display for NotifyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyEvent::EscrowFunded => write!(f, "ESCROW_FUNDED"),
            NotifyEvent::EscrowReleased => write!(f, "ESCROW_RELEASED"),
            NotifyEvent::EscrowDisputed => write!(f, "ESCROW_DISPUTED"),
            NotifyEvent::EscrowRefunded => write!(f, "ESCROW_REFUNDED"),
        }
    }
}

/// A message addressed to one user on the notification bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyMessage {
    /// Recipient user ID (buyer or supplier)
    pub user_id: String,
    pub event: NotifyEvent,
    /// Event-specific JSON payload
    pub payload: Value,
    /// Publish time, Unix milliseconds
    pub timestamp: i64,
}

impl NotifyMessage {
    pub fn new(user_id: impl Into<String>, event: NotifyEvent, payload: Value) -> Self {
        Self {
            user_id: user_id.into(),
            event,
            payload,
            timestamp: now_millis(),
        }
    }
}
