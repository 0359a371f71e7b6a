//! Unified error codes for the Mandi settlement platform
//!
//! Error codes are shared between the settlement server and its API
//! consumers. They are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Escrow errors
//! - 5xxx: Supplier / scoring errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Escrow ====================
    /// Escrow account not found
    EscrowNotFound = 4001,
    /// Illegal escrow state transition (includes lost races)
    InvalidStateTransition = 4002,
    /// Escrow amount is non-positive, non-finite or out of bounds
    InvalidAmount = 4003,
    /// Currency code is not a valid ISO-4217 alpha-3 code
    InvalidCurrency = 4004,
    /// Refund reason is empty
    EmptyRefundReason = 4005,
    /// An escrow account already exists for this order
    EscrowAlreadyExists = 4006,
    /// Escrow account has passed its expiry date
    EscrowExpired = 4007,

    // ==================== 5xxx: Supplier / Scoring ====================
    /// Supplier metrics not found
    SupplierNotFound = 5001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9000,
    /// Database error
    DatabaseError = 9001,
    /// A required dependency is unreachable
    DependencyUnavailable = 9002,
    /// System is busy, retry later
    SystemBusy = 9003,
}

impl ErrorCode {
    /// Default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::ValueOutOfRange => "Value out of range",

            Self::EscrowNotFound => "Escrow account not found",
            Self::InvalidStateTransition => "Invalid escrow state transition",
            Self::InvalidAmount => "Invalid amount",
            Self::InvalidCurrency => "Invalid currency code",
            Self::EmptyRefundReason => "Refund reason must not be empty",
            Self::EscrowAlreadyExists => "Escrow account already exists for this order",
            Self::EscrowExpired => "Escrow account has expired",

            Self::SupplierNotFound => "Supplier metrics not found",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::DependencyUnavailable => "Dependency unavailable",
            Self::SystemBusy => "System busy",
        }
    }

    /// Numeric value of this code
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            8 => Self::ValueOutOfRange,

            4001 => Self::EscrowNotFound,
            4002 => Self::InvalidStateTransition,
            4003 => Self::InvalidAmount,
            4004 => Self::InvalidCurrency,
            4005 => Self::EmptyRefundReason,
            4006 => Self::EscrowAlreadyExists,
            4007 => Self::EscrowExpired,

            5001 => Self::SupplierNotFound,

            9000 => Self::InternalError,
            9001 => Self::DatabaseError,
            9002 => Self::DependencyUnavailable,
            9003 => Self::SystemBusy,

            other => return Err(format!("unknown error code: {}", other)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.as_u16())
    }
}
