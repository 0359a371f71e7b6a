//! Unified error handling for the Mandi settlement platform
//!
//! - [`ErrorCode`] - platform-wide u16 error codes
//! - [`ErrorCategory`] - error classification by code band
//! - [`AppError`] - application error with structured code and details

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, AppResult};
