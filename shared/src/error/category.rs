//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the band of the error code:
/// - 0xxx: General errors
/// - 4xxx: Escrow errors
/// - 5xxx: Supplier / scoring errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Escrow errors (4xxx)
    Escrow,
    /// Supplier / scoring errors (5xxx)
    Supplier,
    /// System errors (9xxx)
    System,
}

impl ErrorCode {
    /// Classify this code into its category band
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            4000..=4999 => ErrorCategory::Escrow,
            5000..=5999 => ErrorCategory::Supplier,
            9000..=9999 => ErrorCategory::System,
            _ => ErrorCategory::General,
        }
    }
}
