//! # Input Attester
//!
//! The signing side of the input pipeline. In production this runs inside
//! the off-chain coprocessor that accepts a client's ciphertexts; locally
//! it is driven by the client-side input builder and by tests.
//!
//! The attester signs only batches it could have produced itself: every
//! entry must be an input handle derived from its ciphertext at its own
//! position under the requested binding.

use ecs_crypto::{Ed25519KeyPair, Ed25519PublicKey};

use crate::proof::{transcript, Attestation, InputCiphertext, InputProof, MAX_BATCH};
use crate::traits::{InputBinding, VerifyError};

/// A set of attester keys that co-sign input batches.
#[derive(Debug)]
pub struct InputAttester {
    keys: Vec<Ed25519KeyPair>,
}

impl InputAttester {
    /// Attester backed by the given keys.
    pub fn new(keys: Vec<Ed25519KeyPair>) -> Self {
        Self { keys }
    }

    /// Public keys of every attester, for configuring a verifier.
    pub fn public_keys(&self) -> Vec<Ed25519PublicKey> {
        self.keys.iter().map(Ed25519KeyPair::public_key).collect()
    }

    /// Sign a batch of inputs for `binding`.
    pub fn attest(
        &self,
        inputs: &[InputCiphertext],
        binding: &InputBinding,
    ) -> Result<InputProof, VerifyError> {
        if inputs.len() > MAX_BATCH {
            return Err(VerifyError::BatchTooLarge {
                len: inputs.len(),
                max: MAX_BATCH,
            });
        }
        for (input, index) in inputs.iter().zip(0u8..) {
            if input.handle.is_computed() {
                return Err(VerifyError::MalformedHandle(format!(
                    "{} is a computed value",
                    input.handle.short()
                )));
            }
            if !input.is_bound_to(index, binding) {
                return Err(VerifyError::ProvenanceMismatch {
                    handle: input.handle.short(),
                });
            }
        }

        let message = transcript(inputs, binding)?;
        let attestations = self
            .keys
            .iter()
            .map(|key| Attestation {
                signer: key.public_key(),
                signature: key.sign(&message),
            })
            .collect();
        Ok(InputProof {
            inputs: inputs.to_vec(),
            attestations,
        })
    }
}
