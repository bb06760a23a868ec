//! # Encrypted Input Builder
//!
//! Client-side preparation of a submission: values are added in order,
//! encrypted under the submitter's binding, and attested as one batch.
//!
//! ```ignore
//! let batch = EncryptedInputBuilder::new(&backend, &attester, binding)
//!     .add32(income)
//!     .add32(debt_ratio)
//!     .add32(repayment_score)
//!     .encrypt()?;
//! contract.submit_credit_data(user, &batch.input(0)?, &batch.input(1)?, &batch.input(2)?)?;
//! ```

use ecs_core::{CiphertextHandle, COMPUTED_INDEX};
use ecs_fhe::{BackendError, InputEncryptor, Plaintext};
use ecs_proof::{InputAttester, InputBinding, InputProof, VerifyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One encrypted argument: a handle and the proof covering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedInput {
    /// The ciphertext handle.
    pub handle: CiphertextHandle,
    /// The batch proof.
    pub proof: InputProof,
}

/// All handles of one batch with their shared proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBatch {
    /// Handles in the order values were added.
    pub handles: Vec<CiphertextHandle>,
    /// Proof attesting every handle.
    pub proof: InputProof,
}

impl EncryptedBatch {
    /// The `index`-th input paired with the batch proof.
    pub fn input(&self, index: usize) -> Result<EncryptedInput, InputError> {
        let handle = self
            .handles
            .get(index)
            .copied()
            .ok_or(InputError::IndexOutOfRange {
                index,
                len: self.handles.len(),
            })?;
        Ok(EncryptedInput {
            handle,
            proof: self.proof.clone(),
        })
    }
}

/// Input preparation errors.
#[derive(Error, Debug)]
pub enum InputError {
    /// Batch indices stop below the computed-value marker.
    #[error("batch holds at most {max} inputs")]
    TooManyInputs {
        /// Maximum batch size.
        max: usize,
    },

    /// Requested input does not exist.
    #[error("input {index} out of range for batch of {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Batch size.
        len: usize,
    },

    /// Encryption failed.
    #[error("encryption: {0}")]
    Backend(#[from] BackendError),

    /// Attestation failed.
    #[error("attestation: {0}")]
    Attestation(#[from] VerifyError),
}

/// Collects plaintext values for one batch.
pub struct EncryptedInputBuilder<'a, E: InputEncryptor + ?Sized> {
    encryptor: &'a E,
    attester: &'a InputAttester,
    binding: InputBinding,
    values: Vec<Plaintext>,
}

impl<'a, E: InputEncryptor + ?Sized> EncryptedInputBuilder<'a, E> {
    /// Start a batch for `binding`.
    pub fn new(encryptor: &'a E, attester: &'a InputAttester, binding: InputBinding) -> Self {
        Self {
            encryptor,
            attester,
            binding,
            values: Vec::new(),
        }
    }

    /// Append a 32-bit value.
    pub fn add32(mut self, value: u32) -> Self {
        self.values.push(Plaintext::Uint32(value));
        self
    }

    /// Append a boolean.
    pub fn add_bool(mut self, value: bool) -> Self {
        self.values.push(Plaintext::Bool(value));
        self
    }

    /// Encrypt every value and attest the batch.
    pub fn encrypt(self) -> Result<EncryptedBatch, InputError> {
        let max = usize::from(COMPUTED_INDEX);
        if self.values.len() > max {
            return Err(InputError::TooManyInputs { max });
        }
        let mut inputs = Vec::with_capacity(self.values.len());
        for (value, index) in self.values.into_iter().zip(0u8..) {
            inputs.push(self.encryptor.encrypt_input(value, index, &self.binding)?);
        }
        let proof = self.attester.attest(&inputs, &self.binding)?;
        Ok(EncryptedBatch {
            handles: proof.handles(),
            proof,
        })
    }
}
