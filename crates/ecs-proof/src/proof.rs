//! # Batch Input Proofs
//!
//! One `InputProof` covers every handle a client encrypted in a single
//! batch. The client passes the same proof alongside each handle; the
//! verifier checks that the handle sits in the attested list at the index
//! recorded inside the handle itself.
//!
//! ## Provenance
//!
//! Each entry pairs a handle with the digest of the ciphertext it names.
//! An input handle is derived from that digest, its batch index, its type
//! and the full binding:
//!
//! ```text
//! H("ecs.input-handle.v1" || ciphertext || index || type || user || contract || chain)
//! ```
//!
//! so a handle encrypted for one submitter cannot be re-listed in another
//! submitter's batch, and a computed handle can never appear at all.
//!
//! ## Transcript
//!
//! Attesters sign the JCS-canonical form of
//!
//! ```text
//! { "domain": "ecs.input-attestation.v1", "chain_id", "contract", "inputs", "user" }
//! ```
//!
//! so a proof produced for one submitter, contract or chain fails for any
//! other.

use ecs_core::{
    CanonicalBytes, CanonicalizationError, CiphertextHandle, ContentDigest, FheType,
    Sha256Accumulator, COMPUTED_INDEX,
};
use ecs_crypto::{Ed25519PublicKey, Ed25519Signature};
use serde::{Deserialize, Serialize};

use crate::traits::{InputBinding, VerifyError};

const TRANSCRIPT_DOMAIN: &str = "ecs.input-attestation.v1";
const HANDLE_DOMAIN: &[u8] = b"ecs.input-handle.v1";

/// Largest batch a proof may attest. Index `COMPUTED_INDEX` is reserved.
pub const MAX_BATCH: usize = COMPUTED_INDEX as usize;

/// An input handle and the digest of the ciphertext it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCiphertext {
    /// The handle derived for this ciphertext.
    pub handle: CiphertextHandle,
    /// Digest of the client ciphertext.
    pub ciphertext: ContentDigest,
}

impl InputCiphertext {
    /// Derive the handle of `ciphertext` as input `index` under `binding`.
    pub fn derive(
        ciphertext: ContentDigest,
        index: u8,
        fhe_type: FheType,
        binding: &InputBinding,
    ) -> Self {
        let mut acc = Sha256Accumulator::new();
        acc.update(HANDLE_DOMAIN)
            .update(ciphertext.as_bytes())
            .update(&[index, fhe_type.tag()])
            .update(binding.user.as_bytes())
            .update(binding.contract.as_bytes())
            .update(&binding.chain_id.value().to_be_bytes());
        let handle = CiphertextHandle::compose(&acc.finalize(), index, binding.chain_id, fhe_type);
        Self { handle, ciphertext }
    }

    /// Whether the handle is the derivation of the ciphertext at `index`
    /// under `binding`. Computed handles are never bound.
    pub fn is_bound_to(&self, index: u8, binding: &InputBinding) -> bool {
        if self.handle.is_computed() || self.handle.index() != index {
            return false;
        }
        match self.handle.fhe_type() {
            Some(fhe_type) => Self::derive(self.ciphertext, index, fhe_type, binding) == *self,
            None => false,
        }
    }
}

/// One attester's signature over the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// The attester's public key.
    pub signer: Ed25519PublicKey,
    /// Signature over the canonical transcript.
    pub signature: Ed25519Signature,
}

/// Attestation that a batch of handles are genuine encryptions for one
/// binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof {
    /// Attested inputs, in batch order.
    pub inputs: Vec<InputCiphertext>,
    /// Attester signatures.
    pub attestations: Vec<Attestation>,
}

impl InputProof {
    /// The empty proof.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the proof carries no attestation at all.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.attestations.is_empty()
    }

    /// The input attested at `index`, if any.
    pub fn attested_at(&self, index: u8) -> Option<&InputCiphertext> {
        self.inputs.get(usize::from(index))
    }

    /// Attested handles, in batch order.
    pub fn handles(&self) -> Vec<CiphertextHandle> {
        self.inputs.iter().map(|input| input.handle).collect()
    }

    /// Wire bytes. The empty proof encodes to zero bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VerifyError> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::to_vec(self).map_err(|e| VerifyError::Decode(e.to_string()))
    }

    /// Decode wire bytes. Zero bytes decode to the empty proof.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VerifyError> {
        if bytes.is_empty() {
            return Ok(Self::empty());
        }
        serde_json::from_slice(bytes).map_err(|e| VerifyError::Decode(e.to_string()))
    }
}

#[derive(Serialize)]
struct Transcript<'a> {
    domain: &'static str,
    chain_id: u64,
    contract: String,
    inputs: &'a [InputCiphertext],
    user: String,
}

/// Canonical transcript bytes for `inputs` under `binding`.
pub(crate) fn transcript(
    inputs: &[InputCiphertext],
    binding: &InputBinding,
) -> Result<CanonicalBytes, CanonicalizationError> {
    CanonicalBytes::new(&Transcript {
        domain: TRANSCRIPT_DOMAIN,
        chain_id: binding.chain_id.value(),
        contract: binding.contract.to_hex(),
        inputs,
        user: binding.user.to_hex(),
    })
}
