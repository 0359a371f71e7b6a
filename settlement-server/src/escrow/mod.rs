//! Escrow state machine
//!
//! Owns the lifecycle of one escrow account tied 1:1 to one order. All
//! legality checks live in [`machine::check_transition`]; the operations
//! here validate arguments and produce the [`EscrowMutation`] the ledger
//! store applies atomically. Side effects (persistence, metrics recompute,
//! notification) belong to the settlement orchestrator, never to this
//! module.

pub mod machine;
pub mod money;

#[cfg(test)]
mod tests;

pub use machine::{EscrowOp, check_transition, is_expired};

use shared::error::{AppError, ErrorCode};
use shared::escrow::EscrowState;
use thiserror::Error;

/// Escrow errors
///
/// The four caller-visible kinds from the settlement contract:
/// invalid argument (amount/currency/reason), not found, invalid state
/// transition (including lost races), and dependency failure. Everything
/// maps onto a platform [`ErrorCode`] at the API boundary.
#[derive(Debug, Error)]
pub enum EscrowError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Refund reason must not be empty")]
    EmptyRefundReason,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Escrow account not found: {0}")]
    NotFound(String),

    #[error("Escrow account already exists for order: {0}")]
    AlreadyExists(String),

    #[error("Invalid state transition: {op} not allowed from {from}")]
    InvalidStateTransition { from: EscrowState, op: EscrowOp },

    #[error("Supplier metrics not found: {0}")]
    SupplierNotFound(String),

    #[error("Ledger unavailable: {0}")]
    Dependency(String),
}

impl From<EscrowError> for AppError {
    fn from(err: EscrowError) -> Self {
        match &err {
            EscrowError::InvalidAmount => AppError::new(ErrorCode::InvalidAmount),
            EscrowError::InvalidCurrency(code) => {
                AppError::with_message(ErrorCode::InvalidCurrency, err.to_string())
                    .with_detail("currency", code.clone())
            }
            EscrowError::EmptyRefundReason => AppError::new(ErrorCode::EmptyRefundReason),
            EscrowError::InvalidArgument(_) => {
                AppError::with_message(ErrorCode::ValidationFailed, err.to_string())
            }
            EscrowError::NotFound(id) => {
                AppError::with_message(ErrorCode::EscrowNotFound, err.to_string())
                    .with_detail("escrow_id", id.clone())
            }
            EscrowError::AlreadyExists(order_id) => {
                AppError::with_message(ErrorCode::EscrowAlreadyExists, err.to_string())
                    .with_detail("order_id", order_id.clone())
            }
            EscrowError::InvalidStateTransition { from, op } => {
                AppError::with_message(ErrorCode::InvalidStateTransition, err.to_string())
                    .with_detail("from", from.to_string())
                    .with_detail("operation", op.to_string())
            }
            EscrowError::SupplierNotFound(id) => {
                AppError::with_message(ErrorCode::SupplierNotFound, err.to_string())
                    .with_detail("supplier_id", id.clone())
            }
            EscrowError::Dependency(_) => {
                AppError::with_message(ErrorCode::DependencyUnavailable, err.to_string())
            }
        }
    }
}

/// Result type for escrow operations
pub type EscrowResult<T> = Result<T, EscrowError>;
