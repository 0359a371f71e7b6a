//! Shared types for the Mandi settlement platform
//!
//! Common types used across multiple crates: escrow domain types,
//! supplier metrics, the badge catalog model, error codes, and
//! notification messages.

pub mod error;
pub mod escrow;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, ErrorCategory, ErrorCode};
pub use escrow::{CreateEscrowInput, EscrowAccount, EscrowMutation, EscrowState};
pub use message::{NotifyEvent, NotifyMessage};
