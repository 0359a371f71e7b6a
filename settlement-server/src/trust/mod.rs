//! Trust Score Engine
//!
//! Pure function of a supplier's historical performance metrics → a bounded
//! score in [0, 100]. No side effects, no I/O, no randomness: identical
//! inputs always yield an identical score. All arithmetic runs on
//! `Decimal` and is rounded to 2 decimal places on exit, so repeated calls
//! are bit-identical.
//!
//! Weighted sum:
//! - on-time delivery rate        × 0.30
//! - (100 − dispute rate, ≥ 0)    × 0.25
//! - completion rate              × 0.20
//! - response-time score          × 0.15
//! - (rating / 5) × 100           × 0.10
//! - volume bonus                 flat 0–5 points, unweighted
//!
//! The response-time score floors at 0 for a 72-hour average and scales
//! linearly to 100 at 0 hours.

use rust_decimal::Decimal;
use shared::models::SupplierMetrics;

use crate::escrow::money::{to_decimal, to_f64};

/// Weight for on-time delivery rate (0.30)
const WEIGHT_DELIVERY: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
/// Weight for the dispute-rate complement (0.25)
const WEIGHT_DISPUTE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);
/// Weight for completion rate (0.20)
const WEIGHT_COMPLETION: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
/// Weight for response-time score (0.15)
const WEIGHT_RESPONSE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);
/// Weight for rating (0.10)
const WEIGHT_RATING: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Response window: an average beyond 72 hours contributes nothing
const RESPONSE_WINDOW_HOURS: i64 = 72;
/// Volume bonus saturates at 5 points (reached at 100 lifetime orders)
const VOLUME_BONUS_CAP: i64 = 5;
const VOLUME_BONUS_ORDERS: i64 = 100;

/// Compute the trust score for a supplier, in [0, 100]
pub fn trust_score(m: &SupplierMetrics) -> f64 {
    let hundred = Decimal::ONE_HUNDRED;

    let delivery = to_decimal(m.on_time_delivery_rate);
    let dispute_complement = (hundred - to_decimal(m.dispute_rate)).max(Decimal::ZERO);
    let completion = to_decimal(m.completion_rate);
    let response = response_time_score(m.average_response_time_hours);
    let rating = to_decimal(m.rating) / Decimal::from(5) * hundred;

    let score = delivery * WEIGHT_DELIVERY
        + dispute_complement * WEIGHT_DISPUTE
        + completion * WEIGHT_COMPLETION
        + response * WEIGHT_RESPONSE
        + rating * WEIGHT_RATING
        + volume_bonus(m.total_orders);

    to_f64(score.clamp(Decimal::ZERO, hundred))
}

/// Linear response-time score: 100 at 0 hours, 0 at >= 72 hours
fn response_time_score(avg_response_hours: f64) -> Decimal {
    let window = Decimal::from(RESPONSE_WINDOW_HOURS);
    let hours = to_decimal(avg_response_hours).max(Decimal::ZERO);
    (window - hours).max(Decimal::ZERO) / window * Decimal::ONE_HUNDRED
}

/// Flat volume bonus: min(5, totalOrders / 100 × 5)
fn volume_bonus(total_orders: i64) -> Decimal {
    let cap = Decimal::from(VOLUME_BONUS_CAP);
    (Decimal::from(total_orders.max(0)) / Decimal::from(VOLUME_BONUS_ORDERS) * cap).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> SupplierMetrics {
        SupplierMetrics {
            supplier_id: "sup-1".to_string(),
            total_orders: 50,
            completed_orders: 42,
            cancelled_orders: 3,
            disputed_orders: 2,
            on_time_delivery_rate: 90.0,
            dispute_rate: 5.0,
            completion_rate: 85.0,
            average_response_time_hours: 3.0,
            rating: 4.2,
            quotes_submitted: 120,
            verified: true,
            joined_at: 0,
            qc_clean_streak: 12,
            social_shares: 4,
        }
    }

    #[test]
    fn test_score_is_deterministic() {
        let m = sample_metrics();
        let first = trust_score(&m);
        let second = trust_score(&m);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_reference_scenario() {
        // 90*0.30 + 95*0.25 + 85*0.20 + 95.83*0.15 + 84*0.10 + 2.5 ≈ 93.03
        let score = trust_score(&sample_metrics());
        assert!((score - 93.03).abs() < 0.01, "got {}", score);
    }

    #[test]
    fn test_score_bounds() {
        let zero = SupplierMetrics::empty("sup-0", 0);
        let score = trust_score(&zero);
        // dispute complement still contributes for a blank supplier:
        // (100 - 0) * 0.25 + 100-response * 0.15 ... response at 0h is 100
        assert!((0.0..=100.0).contains(&score));

        let mut perfect = sample_metrics();
        perfect.on_time_delivery_rate = 100.0;
        perfect.dispute_rate = 0.0;
        perfect.completion_rate = 100.0;
        perfect.average_response_time_hours = 0.0;
        perfect.rating = 5.0;
        perfect.total_orders = 1000;
        assert_eq!(trust_score(&perfect), 100.0);
    }

    #[test]
    fn test_monotonic_in_delivery_rate() {
        let mut m = sample_metrics();
        let mut last = trust_score(&m);
        for rate in [91.0, 95.0, 99.0, 100.0] {
            m.on_time_delivery_rate = rate;
            let next = trust_score(&m);
            assert!(next >= last, "score decreased at rate {}", rate);
            last = next;
        }
    }

    #[test]
    fn test_monotonic_in_completion_rate() {
        let mut m = sample_metrics();
        let mut last = trust_score(&m);
        for rate in [86.0, 90.0, 100.0] {
            m.completion_rate = rate;
            let next = trust_score(&m);
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn test_monotonic_in_rating() {
        let mut m = sample_metrics();
        let mut last = trust_score(&m);
        for rating in [4.3, 4.6, 5.0] {
            m.rating = rating;
            let next = trust_score(&m);
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn test_dispute_complement_clamped() {
        let mut m = sample_metrics();
        m.dispute_rate = 150.0; // pathological input must not go negative
        let with_pathological = trust_score(&m);
        m.dispute_rate = 100.0;
        let with_full = trust_score(&m);
        assert_eq!(with_pathological, with_full);
    }

    #[test]
    fn test_response_time_floor() {
        let mut m = sample_metrics();
        m.average_response_time_hours = 72.0;
        let at_window = trust_score(&m);
        m.average_response_time_hours = 200.0;
        let beyond_window = trust_score(&m);
        // beyond the window the contribution is floored at 0, not negative
        assert_eq!(at_window, beyond_window);
    }

    #[test]
    fn test_volume_bonus_saturates() {
        let mut m = sample_metrics();
        m.total_orders = 100;
        let at_cap = trust_score(&m);
        m.total_orders = 10_000;
        let beyond_cap = trust_score(&m);
        assert_eq!(at_cap, beyond_cap);
    }
}
