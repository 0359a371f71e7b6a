use shared::escrow::{CreateEscrowInput, EscrowAccount, EscrowMutation, EscrowState};
use shared::util::days_millis;

use super::machine::{self, EscrowOp};
use super::{EscrowError, check_transition, is_expired};

const NOW: i64 = 1_750_000_000_000;
const EXPIRY_DAYS: i64 = 30;

fn input() -> CreateEscrowInput {
    CreateEscrowInput {
        order_id: "o1".to_string(),
        buyer_id: "buyer-1".to_string(),
        supplier_id: "sup-1".to_string(),
        amount: 1000.0,
        currency: "INR".to_string(),
    }
}

/// Drive a fresh account into the requested state through real mutations
fn account_in(state: EscrowState) -> EscrowAccount {
    let mut account = machine::create(&input(), NOW, EXPIRY_DAYS).unwrap();
    if state == EscrowState::Pending {
        return account;
    }
    EscrowMutation::Fund {
        payment_method: "upi".to_string(),
        transaction_id: "txn1".to_string(),
        funded_at: NOW + 1,
    }
    .apply(&mut account);
    match state {
        EscrowState::Funded => {}
        EscrowState::Released => EscrowMutation::Release {
            qc_passed: true,
            released_at: NOW + 2,
        }
        .apply(&mut account),
        EscrowState::Disputed => EscrowMutation::Release {
            qc_passed: false,
            released_at: NOW + 2,
        }
        .apply(&mut account),
        EscrowState::Refunded => EscrowMutation::Refund {
            reason: "undelivered".to_string(),
            refunded_at: NOW + 2,
        }
        .apply(&mut account),
        EscrowState::Pending => unreachable!(),
    }
    account
}

// ========================================================================
// Transition table totality
// ========================================================================

#[test]
fn test_transition_table_is_total() {
    const STATES: [EscrowState; 5] = [
        EscrowState::Pending,
        EscrowState::Funded,
        EscrowState::Released,
        EscrowState::Disputed,
        EscrowState::Refunded,
    ];
    const OPS: [EscrowOp; 3] = [EscrowOp::Fund, EscrowOp::Release, EscrowOp::Refund];

    for state in STATES {
        for op in OPS {
            let legal = matches!(
                (state, op),
                (EscrowState::Pending, EscrowOp::Fund)
                    | (EscrowState::Funded, EscrowOp::Release)
                    | (EscrowState::Funded, EscrowOp::Refund)
            );
            let result = check_transition(state, op);
            if legal {
                assert!(result.is_ok(), "({:?}, {:?}) must be legal", state, op);
            } else {
                match result {
                    Err(EscrowError::InvalidStateTransition { from, op: got }) => {
                        assert_eq!(from, state);
                        assert_eq!(got, op);
                    }
                    other => panic!("({:?}, {:?}) must be rejected, got {:?}", state, op, other),
                }
            }
        }
    }
}

#[test]
fn test_terminal_states_reject_every_operation() {
    for state in [
        EscrowState::Released,
        EscrowState::Disputed,
        EscrowState::Refunded,
    ] {
        let account = account_in(state);
        assert!(machine::fund(&account, "upi", "txn2", NOW + 10).is_err());
        assert!(machine::release(&account, true, NOW + 10).is_err());
        assert!(machine::refund(&account, "anything", NOW + 10).is_err());
    }
}

#[test]
fn test_no_account_reenters_pending() {
    // no mutation targets Pending, so a funded account can never go back
    for state in [
        EscrowState::Funded,
        EscrowState::Released,
        EscrowState::Disputed,
        EscrowState::Refunded,
    ] {
        let account = account_in(state);
        assert_ne!(account.state, EscrowState::Pending);
    }
    for mutation in [
        EscrowMutation::Fund {
            payment_method: "upi".to_string(),
            transaction_id: "t".to_string(),
            funded_at: NOW,
        },
        EscrowMutation::Release {
            qc_passed: true,
            released_at: NOW,
        },
        EscrowMutation::Release {
            qc_passed: false,
            released_at: NOW,
        },
        EscrowMutation::Refund {
            reason: "r".to_string(),
            refunded_at: NOW,
        },
    ] {
        assert_ne!(mutation.target_state(), EscrowState::Pending);
    }
}

// ========================================================================
// Create
// ========================================================================

#[test]
fn test_create_builds_pending_account_with_expiry() {
    let account = machine::create(&input(), NOW, EXPIRY_DAYS).unwrap();
    assert_eq!(account.state, EscrowState::Pending);
    assert_eq!(account.created_at, NOW);
    assert_eq!(account.expires_at, NOW + days_millis(EXPIRY_DAYS));
    assert!(account.funded_at.is_none());
    assert!(account.released_at.is_none());
    assert!(account.refunded_at.is_none());
    assert!(account.qc_passed.is_none());
    assert!(!account.id.is_empty());
}

#[test]
fn test_create_rejects_bad_amounts() {
    for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let mut bad = input();
        bad.amount = amount;
        assert!(matches!(
            machine::create(&bad, NOW, EXPIRY_DAYS),
            Err(EscrowError::InvalidAmount)
        ));
    }
}

#[test]
fn test_create_rejects_bad_currency_and_ids() {
    let mut bad = input();
    bad.currency = "RUPEES".to_string();
    assert!(matches!(
        machine::create(&bad, NOW, EXPIRY_DAYS),
        Err(EscrowError::InvalidCurrency(_))
    ));

    let mut bad = input();
    bad.order_id = "  ".to_string();
    assert!(matches!(
        machine::create(&bad, NOW, EXPIRY_DAYS),
        Err(EscrowError::InvalidArgument(_))
    ));
}

#[test]
fn test_create_normalizes_currency_case() {
    let mut lower = input();
    lower.currency = "inr".to_string();
    let account = machine::create(&lower, NOW, EXPIRY_DAYS).unwrap();
    assert_eq!(account.currency, "INR");
}

// ========================================================================
// Fund / Release / Refund argument validation
// ========================================================================

#[test]
fn test_fund_sets_fields_exactly_once() {
    let account = account_in(EscrowState::Pending);
    let mutation = machine::fund(&account, "upi", "txn1", NOW + 5).unwrap();
    let mut funded = account.clone();
    mutation.apply(&mut funded);
    assert_eq!(funded.state, EscrowState::Funded);
    assert_eq!(funded.funded_at, Some(NOW + 5));

    // a second fund is rejected before it could ever touch funded_at
    assert!(machine::fund(&funded, "card", "txn2", NOW + 9).is_err());
    assert_eq!(funded.funded_at, Some(NOW + 5));
}

#[test]
fn test_fund_requires_rail_references() {
    let account = account_in(EscrowState::Pending);
    assert!(matches!(
        machine::fund(&account, "", "txn1", NOW),
        Err(EscrowError::InvalidArgument(_))
    ));
    assert!(matches!(
        machine::fund(&account, "upi", " ", NOW),
        Err(EscrowError::InvalidArgument(_))
    ));
}

#[test]
fn test_release_branches_on_qc_outcome() {
    let funded = account_in(EscrowState::Funded);

    let mut passed = funded.clone();
    machine::release(&passed, true, NOW + 7).unwrap().apply(&mut passed);
    assert_eq!(passed.state, EscrowState::Released);
    assert_eq!(passed.qc_passed, Some(true));
    assert_eq!(passed.released_at, Some(NOW + 7));

    let mut failed = funded.clone();
    machine::release(&failed, false, NOW + 7).unwrap().apply(&mut failed);
    assert_eq!(failed.state, EscrowState::Disputed);
    assert_eq!(failed.qc_passed, Some(false));
    // both branches set released_at
    assert_eq!(failed.released_at, Some(NOW + 7));
}

#[test]
fn test_refund_requires_non_empty_reason() {
    let funded = account_in(EscrowState::Funded);
    assert!(matches!(
        machine::refund(&funded, "", NOW),
        Err(EscrowError::EmptyRefundReason)
    ));
    assert!(matches!(
        machine::refund(&funded, "   ", NOW),
        Err(EscrowError::EmptyRefundReason)
    ));

    let mut refunded = funded.clone();
    machine::refund(&refunded, "  buyer request ", NOW + 3)
        .unwrap()
        .apply(&mut refunded);
    assert_eq!(refunded.state, EscrowState::Refunded);
    assert_eq!(refunded.refund_reason.as_deref(), Some("buyer request"));
    assert_eq!(refunded.refunded_at, Some(NOW + 3));
}

#[test]
fn test_refund_rejected_on_pending() {
    // only funded money can be refunded; an unfunded account has nothing
    // to return
    let pending = account_in(EscrowState::Pending);
    assert!(matches!(
        machine::refund(&pending, "changed my mind", NOW),
        Err(EscrowError::InvalidStateTransition {
            from: EscrowState::Pending,
            op: EscrowOp::Refund,
        })
    ));
}

// ========================================================================
// Expiry observation
// ========================================================================

#[test]
fn test_expiry_only_observed_while_pending() {
    let pending = account_in(EscrowState::Pending);
    assert!(!is_expired(&pending, pending.expires_at - 1));
    assert!(is_expired(&pending, pending.expires_at));
    assert!(is_expired(&pending, pending.expires_at + days_millis(365)));

    let funded = account_in(EscrowState::Funded);
    assert!(!is_expired(&funded, funded.expires_at + 1));
}
