//! Money validation and conversion using rust_decimal for precision
//!
//! Escrow amounts arrive as `f64` over the API boundary and are validated
//! here before any account is created. All arithmetic (trust scoring
//! included) is done on `Decimal` and converted back to `f64` only for
//! storage/serialization.

use super::EscrowError;
use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum escrow amount per order (₹10,000,000)
pub const MAX_AMOUNT: f64 = 10_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64) -> Result<(), EscrowError> {
    if !value.is_finite() {
        return Err(EscrowError::InvalidAmount);
    }
    Ok(())
}

/// Validate an escrow amount before account creation
///
/// Amount must be finite, strictly positive, within bounds, and carry at
/// most two decimal places (sub-paisa amounts cannot settle on any rail).
pub fn validate_amount(amount: f64) -> Result<(), EscrowError> {
    require_finite(amount)?;
    if amount <= 0.0 || amount > MAX_AMOUNT {
        return Err(EscrowError::InvalidAmount);
    }
    let dec = to_decimal(amount);
    if dec != dec.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero) {
        return Err(EscrowError::InvalidAmount);
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated via `require_finite()` at the
/// boundary. If NaN/Infinity somehow reaches here, logs an error and
/// returns ZERO to avoid silent corruption in settlement arithmetic.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in settlement arithmetic, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp with inputs bounded at the boundary
        // is always within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_validate_amount_bounds() {
        assert!(validate_amount(1000.0).is_ok());
        assert!(validate_amount(0.01).is_ok());
        assert!(validate_amount(MAX_AMOUNT).is_ok());

        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-5.0).is_err());
        assert!(validate_amount(MAX_AMOUNT + 0.01).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_amount_rejects_sub_paisa() {
        assert!(validate_amount(10.005).is_err());
        assert!(validate_amount(10.99).is_ok());
    }

    #[test]
    fn test_money_eq_tolerance() {
        assert!(money_eq(10.0, 10.009));
        assert!(!money_eq(10.0, 10.02));
    }
}
