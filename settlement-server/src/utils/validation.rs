//! Boundary validation helpers
//!
//! Domain validation shared by the state machine and the API layer.
//! Length limits keep opaque references and free-text fields bounded
//! before they reach the ledger store.

use crate::escrow::{EscrowError, EscrowResult};

/// Maximum length for opaque identifiers (order/party/payment references)
pub const MAX_ID_LEN: usize = 64;

/// Maximum length for free-text fields (refund reason)
pub const MAX_TEXT_LEN: usize = 500;

/// Validate an ISO-4217 alpha-3 currency code (case-insensitive)
pub fn validate_currency(code: &str) -> EscrowResult<()> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(EscrowError::InvalidCurrency(code.to_string()))
    }
}

/// Validate a required identifier: non-empty after trim, within bounds
pub fn validate_required_id(value: &str, field: &str) -> EscrowResult<()> {
    if value.trim().is_empty() {
        return Err(EscrowError::InvalidArgument(format!(
            "{} must not be empty",
            field
        )));
    }
    if value.len() > MAX_ID_LEN {
        return Err(EscrowError::InvalidArgument(format!(
            "{} exceeds maximum length ({})",
            field, MAX_ID_LEN
        )));
    }
    Ok(())
}

/// Validate a free-text field against the platform length limit
pub fn validate_text(value: &str, field: &str) -> EscrowResult<()> {
    if value.len() > MAX_TEXT_LEN {
        return Err(EscrowError::InvalidArgument(format!(
            "{} exceeds maximum length ({})",
            field, MAX_TEXT_LEN
        )));
    }
    Ok(())
}
