//! # Rejected Transactions Leave No Trace
//!
//! Every rejection below is checked against a full snapshot of the
//! contract state taken before the call.

mod common;

use common::{alice, attester, bob, Harness};
use ecs_contract::{
    ContractConfig, EncryptedCreditScore, EncryptedInput, EncryptedInputBuilder, ScoreError,
};
use ecs_core::{Address, ChainId, CiphertextHandle};
use ecs_crypto::Ed25519KeyPair;
use ecs_fhe::{Decryptor, InputEncryptor, MockBackend, Plaintext};
use ecs_proof::{
    InputAttester, InputBinding, InputCiphertext, InputProof, SignerSetVerifier, VerifyError,
    MAX_BATCH,
};
use ecs_state::ThresholdInit;

fn assert_invalid_proof(result: Result<impl std::fmt::Debug, ScoreError>) {
    match result {
        Err(ScoreError::InvalidProof(_)) => {}
        other => panic!("expected InvalidProof, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// 1. One bad input aborts the whole submission
// ---------------------------------------------------------------------------

#[test]
fn empty_proof_on_last_input_aborts() {
    let mut h = Harness::deploy();
    let before = h.contract.state().clone();
    let inputs = h.encrypt(alice(), &[50_000, 30, 85]);
    let bad = EncryptedInput {
        handle: inputs[2].handle,
        proof: InputProof::empty(),
    };
    assert_invalid_proof(h.contract.submit_credit_data(alice(), &inputs[0], &inputs[1], &bad));
    assert_eq!(h.contract.state(), &before);
    assert!(!h.contract.has_credit_data(&alice()));
}

#[test]
fn bad_input_leaves_existing_record_unchanged() {
    let mut h = Harness::deploy();
    h.submit(alice(), 50_000, 30, 85).unwrap();
    let before = h.contract.state().clone();

    let inputs = h.encrypt(alice(), &[10, 99, 1]);
    let foreign = h.encrypt(bob(), &[99]);
    assert_invalid_proof(h.contract.submit_credit_data(
        alice(),
        &inputs[0],
        &foreign[0],
        &inputs[2],
    ));
    assert_eq!(h.contract.state(), &before);
    assert_eq!(h.plain(h.contract.get_credit_score(&alice()).unwrap()), 80);
}

#[test]
fn zero_handle_rejected() {
    let mut h = Harness::deploy();
    let inputs = h.encrypt(alice(), &[50_000, 30, 85]);
    let zero = EncryptedInput {
        handle: CiphertextHandle::ZERO,
        proof: inputs[0].proof.clone(),
    };
    assert_invalid_proof(h.contract.submit_credit_data(alice(), &zero, &inputs[1], &inputs[2]));
}

// ---------------------------------------------------------------------------
// 2. Inputs bound to someone or somewhere else
// ---------------------------------------------------------------------------

#[test]
fn replayed_inputs_from_other_user_rejected() {
    let mut h = Harness::deploy();
    let stolen = h.encrypt(alice(), &[50_000, 30, 85]);
    let before = h.contract.state().clone();
    assert_invalid_proof(h.contract.submit_credit_data(bob(), &stolen[0], &stolen[1], &stolen[2]));
    assert_eq!(h.contract.state(), &before);
}

#[test]
fn inputs_for_other_contract_rejected() {
    let mut h = Harness::deploy();
    let elsewhere = InputBinding {
        user: alice(),
        contract: Address::from_label("another-instance"),
        chain_id: ChainId::LOCAL,
    };
    let batch = EncryptedInputBuilder::new(&h.backend, &h.attester, elsewhere)
        .add32(50_000)
        .add32(30)
        .add32(85)
        .encrypt()
        .unwrap();
    let i: Vec<_> = (0..3).map(|n| batch.input(n).unwrap()).collect();
    assert_invalid_proof(h.contract.submit_credit_data(alice(), &i[0], &i[1], &i[2]));
}

#[test]
fn inputs_for_other_chain_rejected() {
    let mut h = Harness::deploy();
    let sepolia = InputBinding {
        chain_id: ChainId::SEPOLIA,
        ..h.binding(alice())
    };
    let batch = EncryptedInputBuilder::new(&h.backend, &h.attester, sepolia)
        .add32(50_000)
        .add32(30)
        .add32(85)
        .encrypt()
        .unwrap();
    let i: Vec<_> = (0..3).map(|n| batch.input(n).unwrap()).collect();
    assert_invalid_proof(h.contract.submit_credit_data(alice(), &i[0], &i[1], &i[2]));
}

#[test]
fn under_attested_inputs_rejected() {
    let mut h = Harness::deploy();
    let lone = InputAttester::new(vec![Ed25519KeyPair::from_seed(&[0xa1; 32])]);
    let batch = EncryptedInputBuilder::new(&h.backend, &lone, h.binding(alice()))
        .add32(50_000)
        .add32(30)
        .add32(85)
        .encrypt()
        .unwrap();
    let i: Vec<_> = (0..3).map(|n| batch.input(n).unwrap()).collect();
    assert_invalid_proof(h.contract.submit_credit_data(alice(), &i[0], &i[1], &i[2]));
}

#[test]
fn boolean_input_rejected_as_number() {
    let mut h = Harness::deploy();
    let batch = EncryptedInputBuilder::new(&h.backend, &h.attester, h.binding(alice()))
        .add32(50_000)
        .add_bool(true)
        .add32(85)
        .encrypt()
        .unwrap();
    let i: Vec<_> = (0..3).map(|n| batch.input(n).unwrap()).collect();
    assert_invalid_proof(h.contract.submit_credit_data(alice(), &i[0], &i[1], &i[2]));
    assert!(!h.contract.has_credit_data(&alice()));
}

// ---------------------------------------------------------------------------
// 3. Handles that were never the submitter's own input
// ---------------------------------------------------------------------------

fn invalid_proof_reason(result: Result<impl std::fmt::Debug, ScoreError>) -> String {
    match result {
        Err(ScoreError::InvalidProof(reason)) => reason,
        other => panic!("expected InvalidProof, got {other:?}"),
    }
}

fn own_input(h: &Harness, user: Address, value: u32, index: u8) -> InputCiphertext {
    h.backend
        .encrypt_input(Plaintext::Uint32(value), index, &h.binding(user))
        .unwrap()
}

#[test]
fn stored_score_cannot_enter_as_input() {
    let mut h = Harness::deploy();
    h.submit(alice(), 50_000, 30, 85).unwrap();
    let score = CiphertextHandle::from(h.contract.get_credit_score(&alice()).unwrap());
    assert!(score.is_computed());
    let before = h.contract.state().clone();

    // The attester will not sign a batch that parks the score at the
    // computed-value index.
    let mut batch: Vec<_> = (0..MAX_BATCH as u8)
        .map(|i| own_input(&h, bob(), 1, i))
        .collect();
    let ciphertext = batch[0].ciphertext;
    batch.push(InputCiphertext {
        handle: score,
        ciphertext,
    });
    assert!(h.attester.attest(&batch, &h.binding(bob())).is_err());
    assert!(matches!(
        h.attester.attest(&batch[MAX_BATCH..], &h.binding(bob())).unwrap_err(),
        VerifyError::MalformedHandle(_)
    ));

    // Nor does the contract accept it next to a genuine proof.
    let own = h.encrypt(bob(), &[50_000, 30, 85]);
    let smuggled = EncryptedInput {
        handle: score,
        proof: own[1].proof.clone(),
    };
    let reason = invalid_proof_reason(h.contract.submit_credit_data(
        bob(),
        &own[0],
        &smuggled,
        &own[2],
    ));
    assert!(reason.contains("computed value"), "{reason}");
    assert_eq!(h.contract.state(), &before);
    assert!(!h.contract.has_credit_data(&bob()));
    assert!(h.user_decrypt(score, bob()).is_err());
}

#[test]
fn input_encrypted_for_other_user_rejected() {
    let mut h = Harness::deploy();
    let alices = h.encrypt(alice(), &[37_000, 30, 85]);
    let income = *alices[0].proof.attested_at(0).unwrap();
    let before = h.contract.state().clone();

    // Re-attesting Alice's ciphertext under Bob's binding is refused.
    let batch = [income, own_input(&h, bob(), 30, 1), own_input(&h, bob(), 85, 2)];
    assert!(matches!(
        h.attester.attest(&batch, &h.binding(bob())).unwrap_err(),
        VerifyError::ProvenanceMismatch { .. }
    ));

    // Alice's handle with Alice's proof does not verify for Bob.
    let reason = invalid_proof_reason(h.contract.submit_credit_data(
        bob(),
        &alices[0],
        &alices[1],
        &alices[2],
    ));
    assert!(reason.contains("not encrypted under this binding"), "{reason}");

    // Alice's handle next to Bob's own proof is not attested.
    let own = h.encrypt(bob(), &[50_000, 30, 85]);
    let borrowed = EncryptedInput {
        handle: alices[0].handle,
        proof: own[0].proof.clone(),
    };
    assert_invalid_proof(h.contract.submit_credit_data(bob(), &borrowed, &own[1], &own[2]));

    assert_eq!(h.contract.state(), &before);
    assert!(!h.contract.has_credit_data(&bob()));
    assert!(h.user_decrypt(alices[0].handle, bob()).is_err());
}

// ---------------------------------------------------------------------------
// 4. Threshold paths
// ---------------------------------------------------------------------------

#[test]
fn bad_threshold_update_keeps_threshold() {
    let mut h = Harness::deploy();
    let before = h.contract.state().clone();
    let input = h.encrypt(h.deployer, &[70]).remove(0);
    assert_invalid_proof(h.contract.set_threshold(h.deployer, input.handle, &InputProof::empty()));
    assert_eq!(h.contract.state(), &before);
}

#[test]
fn authenticated_deploy_uses_supplied_threshold() {
    let deployer = Address::from_label("deployer");
    let config = ContractConfig::new(deployer, ChainId::LOCAL);
    let attester = attester();
    let backend = MockBackend::new(ChainId::LOCAL);
    let binding = InputBinding {
        user: deployer,
        contract: config.address,
        chain_id: ChainId::LOCAL,
    };
    let batch = EncryptedInputBuilder::new(&backend, &attester, binding)
        .add32(65)
        .encrypt()
        .unwrap();
    let init = ThresholdInit::from_raw(batch.handles[0], batch.proof.clone()).unwrap();
    let verifier = SignerSetVerifier::new(attester.public_keys(), 2).unwrap();
    let contract = EncryptedCreditScore::deploy(config, init, backend.clone(), verifier).unwrap();

    let t = contract.get_threshold();
    assert_eq!(backend.decrypt(t.handle()).unwrap().as_u64(), 65);
}

#[test]
fn authenticated_deploy_with_foreign_proof_fails() {
    let deployer = Address::from_label("deployer");
    let config = ContractConfig::new(deployer, ChainId::LOCAL);
    let attester = attester();
    let backend = MockBackend::new(ChainId::LOCAL);
    let wrong = InputBinding {
        user: alice(),
        contract: config.address,
        chain_id: ChainId::LOCAL,
    };
    let batch = EncryptedInputBuilder::new(&backend, &attester, wrong)
        .add32(65)
        .encrypt()
        .unwrap();
    let init = ThresholdInit::Authenticated {
        handle: batch.handles[0],
        proof: batch.proof,
    };
    let verifier = SignerSetVerifier::new(attester.public_keys(), 2).unwrap();
    let result = EncryptedCreditScore::deploy(config, init, backend, verifier).map(|_| ());
    assert_invalid_proof(result);
}
