//! # Input Verifier Trait
//!
//! The contract depends on `InputVerifier` only, so a signer-set verifier,
//! a zero-knowledge verifier, or a test double are interchangeable.
//!
//! ## Security Invariant
//!
//! A successful verification means the handle may be trusted as a genuine
//! encryption by `binding.user` for `binding.contract` on `binding.chain_id`.
//! Any other outcome is an error; there is no "unknown" result.

use ecs_core::{Address, CanonicalizationError, ChainId, CiphertextHandle, FheType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proof::InputProof;

/// The context an input must be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBinding {
    /// The account submitting the input.
    pub user: Address,
    /// The contract instance that will consume it.
    pub contract: Address,
    /// The host network.
    pub chain_id: ChainId,
}

/// A handle that passed verification.
///
/// Only verifiers in this crate construct one, so holding a
/// `VerifiedInput` means a proof was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedInput {
    handle: CiphertextHandle,
    fhe_type: FheType,
}

impl VerifiedInput {
    pub(crate) fn new(handle: CiphertextHandle, fhe_type: FheType) -> Self {
        Self { handle, fhe_type }
    }

    /// The verified handle.
    pub fn handle(&self) -> CiphertextHandle {
        self.handle
    }

    /// Its encrypted type.
    pub fn fhe_type(&self) -> FheType {
        self.fhe_type
    }
}

/// Reasons an input proof is rejected.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof carries no attestation.
    #[error("empty input proof")]
    EmptyProof,

    /// The handle is empty or malformed.
    #[error("malformed handle: {0}")]
    MalformedHandle(String),

    /// The handle was minted for another chain.
    #[error("handle minted for {found}, expected {expected}")]
    ChainMismatch {
        /// Chain in the binding.
        expected: ChainId,
        /// Chain encoded in the handle.
        found: ChainId,
    },

    /// The handle is not the one the proof attests at its index.
    #[error("handle {handle} is not attested by this proof")]
    HandleNotAttested {
        /// Short handle prefix.
        handle: String,
    },

    /// The proof lists more inputs than a batch can index.
    #[error("batch of {len} inputs exceeds the maximum of {max}")]
    BatchTooLarge {
        /// Inputs in the proof.
        len: usize,
        /// Maximum batch size.
        max: usize,
    },

    /// The handle is not derived from its ciphertext under this binding.
    #[error("handle {handle} was not encrypted under this binding")]
    ProvenanceMismatch {
        /// Short handle prefix.
        handle: String,
    },

    /// Not enough trusted attesters signed this binding.
    #[error("insufficient attester signatures: {valid} valid, {required} required")]
    InsufficientSignatures {
        /// Distinct valid signatures found.
        valid: usize,
        /// Signatures required.
        required: usize,
    },

    /// The transcript could not be canonicalized.
    #[error("transcript error: {0}")]
    Transcript(#[from] CanonicalizationError),

    /// The proof bytes could not be decoded.
    #[error("undecodable proof: {0}")]
    Decode(String),
}

/// Validates externally supplied encrypted inputs.
pub trait InputVerifier: Send + Sync {
    /// Verify that `proof` attests `handle` for `binding`.
    fn verify_input(
        &self,
        handle: &CiphertextHandle,
        proof: &InputProof,
        binding: &InputBinding,
    ) -> Result<VerifiedInput, VerifyError>;
}
