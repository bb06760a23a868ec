//! # Signer-Set Verifier
//!
//! Accepts an input when at least `threshold` distinct trusted attesters
//! signed the proof's transcript for the caller's binding.
//!
//! Checks run in a fixed order so the first failure is reported:
//!
//! 1. proof is non-empty
//! 2. handle is well formed and is an input, not a computed value
//! 3. handle was minted for the binding's chain
//! 4. proof lists no more than `MAX_BATCH` inputs
//! 5. proof attests this exact handle at the handle's index
//! 6. handle derives from its attested ciphertext under the binding
//! 7. enough trusted signatures over the transcript

use std::collections::BTreeSet;

use ecs_core::CiphertextHandle;
use ecs_crypto::{verify, Ed25519PublicKey};

use crate::proof::{transcript, InputProof, MAX_BATCH};
use crate::traits::{InputBinding, InputVerifier, VerifiedInput, VerifyError};

/// Verifier backed by a fixed set of trusted attester keys.
#[derive(Debug, Clone)]
pub struct SignerSetVerifier {
    signers: BTreeSet<Ed25519PublicKey>,
    threshold: usize,
}

/// Invalid verifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attester threshold {threshold} must be between 1 and {signers}")]
pub struct SignerSetError {
    /// Requested threshold.
    pub threshold: usize,
    /// Number of distinct signers.
    pub signers: usize,
}

impl SignerSetVerifier {
    /// Verifier trusting `signers`, requiring `threshold` of them.
    pub fn new(
        signers: impl IntoIterator<Item = Ed25519PublicKey>,
        threshold: usize,
    ) -> Result<Self, SignerSetError> {
        let signers: BTreeSet<_> = signers.into_iter().collect();
        if threshold == 0 || threshold > signers.len() {
            return Err(SignerSetError {
                threshold,
                signers: signers.len(),
            });
        }
        Ok(Self { signers, threshold })
    }

    /// Required signature count.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether `key` is a trusted attester.
    pub fn trusts(&self, key: &Ed25519PublicKey) -> bool {
        self.signers.contains(key)
    }
}

impl InputVerifier for SignerSetVerifier {
    fn verify_input(
        &self,
        handle: &CiphertextHandle,
        proof: &InputProof,
        binding: &InputBinding,
    ) -> Result<VerifiedInput, VerifyError> {
        if proof.is_empty() {
            return Err(VerifyError::EmptyProof);
        }

        let fhe_type = handle
            .validate()
            .map_err(|e| VerifyError::MalformedHandle(e.to_string()))?;

        if handle.is_computed() {
            return Err(VerifyError::MalformedHandle(format!(
                "{} is a computed value",
                handle.short()
            )));
        }

        if handle.chain_id() != binding.chain_id {
            return Err(VerifyError::ChainMismatch {
                expected: binding.chain_id,
                found: handle.chain_id(),
            });
        }

        if proof.inputs.len() > MAX_BATCH {
            return Err(VerifyError::BatchTooLarge {
                len: proof.inputs.len(),
                max: MAX_BATCH,
            });
        }

        let entry = proof
            .attested_at(handle.index())
            .filter(|entry| entry.handle == *handle)
            .ok_or_else(|| VerifyError::HandleNotAttested {
                handle: handle.short(),
            })?;

        if !entry.is_bound_to(handle.index(), binding) {
            tracing::warn!(
                handle = %handle.short(),
                user = %binding.user,
                "input not encrypted under the submitter's binding"
            );
            return Err(VerifyError::ProvenanceMismatch {
                handle: handle.short(),
            });
        }

        let message = transcript(&proof.inputs, binding)?;
        let mut valid = BTreeSet::new();
        for attestation in &proof.attestations {
            if !self.trusts(&attestation.signer) {
                tracing::debug!(signer = ?attestation.signer, "ignoring untrusted attester");
                continue;
            }
            if verify(&message, &attestation.signature, &attestation.signer).is_ok() {
                valid.insert(attestation.signer);
            }
        }

        if valid.len() < self.threshold {
            tracing::warn!(
                handle = %handle.short(),
                user = %binding.user,
                valid = valid.len(),
                required = self.threshold,
                "input proof rejected"
            );
            return Err(VerifyError::InsufficientSignatures {
                valid: valid.len(),
                required: self.threshold,
            });
        }

        tracing::debug!(handle = %handle.short(), fhe_type = fhe_type.as_str(), "input verified");
        Ok(VerifiedInput::new(*handle, fhe_type))
    }
}
