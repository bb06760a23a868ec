//! # Backend Interface
//!
//! All operators take and return raw handles. Typing is enforced one layer
//! up by the engine; backends still reject operands of the wrong type.
//!
//! ## Arithmetic
//!
//! 32-bit unsigned, saturating:
//!
//! - `add`, `sub` clamp to `[0, u32::MAX]`
//! - `scale(a, n, d)` is `floor(a * n / d)` with a 64-bit intermediate,
//!   saturated to 32 bits; `d == 0` is an error
//! - `min(a, cap)` is the smaller of `a` and the plaintext `cap`
//! - `ge(a, b)` yields an encrypted boolean

use ecs_core::{CiphertextHandle, FheType};
use ecs_proof::{InputBinding, InputCiphertext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A decrypted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Plaintext {
    /// Boolean.
    Bool(bool),
    /// 32-bit unsigned integer.
    Uint32(u32),
}

impl Plaintext {
    /// The encrypted type this plaintext maps to.
    pub fn fhe_type(&self) -> FheType {
        match self {
            Self::Bool(_) => FheType::Bool,
            Self::Uint32(_) => FheType::Uint32,
        }
    }

    /// Numeric view; booleans decrypt to `0` or `1`.
    pub fn as_u64(&self) -> u64 {
        match self {
            Self::Bool(b) => u64::from(*b),
            Self::Uint32(v) => u64::from(*v),
        }
    }
}

impl std::fmt::Display for Plaintext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

/// Errors raised by a confidential backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// No ciphertext is stored under this handle.
    #[error("unknown ciphertext {0}")]
    UnknownHandle(String),

    /// An operand has the wrong encrypted type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type the operator requires.
        expected: FheType,
        /// Type of the operand.
        found: FheType,
    },

    /// Scaling by a zero denominator.
    #[error("division by zero")]
    DivisionByZero,
}

/// Homomorphic operators over ciphertext handles.
pub trait ConfidentialBackend: Send + Sync {
    /// Encrypt a public constant.
    fn trivial_encrypt(&self, value: Plaintext) -> Result<CiphertextHandle, BackendError>;

    /// `a + b`, saturating.
    fn add(&self, a: &CiphertextHandle, b: &CiphertextHandle)
        -> Result<CiphertextHandle, BackendError>;

    /// `a - b`, saturating at zero.
    fn sub(&self, a: &CiphertextHandle, b: &CiphertextHandle)
        -> Result<CiphertextHandle, BackendError>;

    /// `floor(a * numerator / denominator)`.
    fn scale(
        &self,
        a: &CiphertextHandle,
        numerator: u32,
        denominator: u32,
    ) -> Result<CiphertextHandle, BackendError>;

    /// `min(a, cap)`.
    fn min(&self, a: &CiphertextHandle, cap: u32) -> Result<CiphertextHandle, BackendError>;

    /// `a >= b` as an encrypted boolean.
    fn ge(&self, a: &CiphertextHandle, b: &CiphertextHandle)
        -> Result<CiphertextHandle, BackendError>;
}

/// Client-side encryption of fresh inputs.
pub trait InputEncryptor {
    /// Encrypt `value` as input number `index` of a batch bound to `binding`.
    fn encrypt_input(
        &self,
        value: Plaintext,
        index: u8,
        binding: &InputBinding,
    ) -> Result<InputCiphertext, BackendError>;
}

/// Off-chain decryption, used only by the relay.
pub trait Decryptor {
    /// Recover the plaintext behind `handle`.
    fn decrypt(&self, handle: &CiphertextHandle) -> Result<Plaintext, BackendError>;
}
