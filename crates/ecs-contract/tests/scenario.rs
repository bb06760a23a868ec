//! # End-to-End Scoring Scenarios
//!
//! Worked example: income 50000, debt ratio 30, repayment 85, threshold 50.
//! First submission scores 80 from a baseline of 72; the second uses 80 as
//! its prior and scores 84.

mod common;

use common::{alice, bob, Harness};
use ecs_contract::{ContractEvent, ScoreError};
use ecs_fhe::Plaintext;

// ---------------------------------------------------------------------------
// 1. First and repeated submission
// ---------------------------------------------------------------------------

#[test]
fn scenario_first_submission_scores_80() {
    let mut h = Harness::deploy();
    let t = h.submit(alice(), 50_000, 30, 85).unwrap();
    assert!(t.is_first());

    assert!(h.contract.has_credit_data(&alice()));
    assert_eq!(h.plain(h.contract.get_last_score(&alice()).unwrap()), 72);
    assert_eq!(h.plain(h.contract.get_credit_score(&alice()).unwrap()), 80);
    assert_eq!(
        h.plain(h.contract.get_qualification_status(&alice()).unwrap()),
        1
    );
}

#[test]
fn scenario_second_submission_carries_score_forward() {
    let mut h = Harness::deploy();
    h.submit(alice(), 50_000, 30, 85).unwrap();
    let first = h.contract.get_credit_score(&alice()).unwrap();

    let t = h.submit(alice(), 50_000, 30, 85).unwrap();
    assert!(!t.is_first());

    let last = h.contract.get_last_score(&alice()).unwrap();
    assert_eq!(last, first);
    assert_eq!(h.plain(last), 80);
    assert_eq!(h.plain(h.contract.get_credit_score(&alice()).unwrap()), 84);
}

#[test]
fn scenario_low_score_does_not_qualify() {
    let mut h = Harness::deploy();
    h.submit(alice(), 2_000, 90, 10).unwrap();
    assert_eq!(h.plain(h.contract.get_credit_score(&alice()).unwrap()), 21);
    assert_eq!(
        h.plain(h.contract.get_qualification_status(&alice()).unwrap()),
        0
    );
}

#[test]
fn scenario_accounts_are_independent() {
    let mut h = Harness::deploy();
    h.submit(alice(), 50_000, 30, 85).unwrap();
    h.submit(bob(), 2_000, 90, 10).unwrap();
    h.submit(alice(), 50_000, 30, 85).unwrap();
    assert_eq!(h.plain(h.contract.get_credit_score(&alice()).unwrap()), 84);
    assert_eq!(h.plain(h.contract.get_credit_score(&bob()).unwrap()), 21);
}

// ---------------------------------------------------------------------------
// 2. Threshold updates
// ---------------------------------------------------------------------------

#[test]
fn scenario_raised_threshold_disqualifies() {
    let mut h = Harness::deploy();
    let deployer = h.deployer;
    h.set_threshold(deployer, 81).unwrap();
    assert_eq!(h.plain(h.contract.get_threshold()), 81);

    h.submit(alice(), 50_000, 30, 85).unwrap();
    assert_eq!(
        h.plain(h.contract.get_qualification_status(&alice()).unwrap()),
        0
    );
}

#[test]
fn scenario_threshold_update_is_owner_only() {
    let mut h = Harness::deploy();
    let before = h.contract.get_threshold();
    let err = h.set_threshold(alice(), 10).unwrap_err();
    assert!(matches!(err, ScoreError::Unauthorized { caller } if caller == alice()));
    assert_eq!(h.contract.get_threshold(), before);
}

// ---------------------------------------------------------------------------
// 3. Decryption through the relay
// ---------------------------------------------------------------------------

#[test]
fn scenario_owner_decrypts_own_score_only() {
    let mut h = Harness::deploy();
    h.submit(alice(), 50_000, 30, 85).unwrap();
    let score = h.contract.get_credit_score(&alice()).unwrap();
    assert_eq!(h.user_decrypt(score, alice()).unwrap(), Plaintext::Uint32(80));
    assert!(h.user_decrypt(score, bob()).is_err());

    let qualified = h.contract.get_qualification_status(&alice()).unwrap();
    assert_eq!(h.user_decrypt(qualified, alice()).unwrap(), Plaintext::Bool(true));
}

#[test]
fn scenario_event_log_records_transitions() {
    let mut h = Harness::deploy();
    h.submit(alice(), 50_000, 30, 85).unwrap();
    h.submit(alice(), 40_000, 20, 90).unwrap();
    let events: Vec<_> = h.contract.events().iter().map(|r| r.event.clone()).collect();
    assert!(matches!(
        events[0],
        ContractEvent::Deployed {
            default_threshold: true,
            ..
        }
    ));
    assert_eq!(
        events[1],
        ContractEvent::CreditDataSubmitted {
            account: alice(),
            first_submission: true
        }
    );
    assert_eq!(
        events[2],
        ContractEvent::CreditDataSubmitted {
            account: alice(),
            first_submission: false
        }
    );
}
