//! Escrow domain types shared between the settlement server and API consumers

pub mod event;
pub mod types;

pub use event::{SettlementEvent, SettlementEventType, SettlementPayload};
pub use types::{CreateEscrowInput, EscrowAccount, EscrowMutation, EscrowState};
