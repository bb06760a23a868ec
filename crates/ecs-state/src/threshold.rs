//! # Global Threshold
//!
//! The qualification threshold is one encrypted slot, defined from
//! construction onward and replaced only by an authenticated update.
//!
//! Construction takes a [`ThresholdInit`]. The two paths are distinct
//! variants, so the unverified default cannot be selected by passing an
//! empty proof to any later call.

use ecs_core::{CiphertextHandle, Euint32};
use ecs_proof::InputProof;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The single encrypted threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdStore {
    current: Euint32,
    revision: u64,
}

impl ThresholdStore {
    /// Slot holding `initial`.
    pub fn new(initial: Euint32) -> Self {
        Self {
            current: initial,
            revision: 0,
        }
    }

    /// The current threshold.
    pub fn current(&self) -> Euint32 {
        self.current
    }

    /// Number of replacements since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Swap in a new threshold, returning the previous one.
    pub fn replace(&mut self, next: Euint32) -> Euint32 {
        self.revision += 1;
        std::mem::replace(&mut self.current, next)
    }
}

/// How the initial threshold is supplied at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdInit {
    /// A client-encrypted threshold that must pass input verification.
    Authenticated {
        /// The encrypted threshold.
        handle: CiphertextHandle,
        /// Its input proof.
        proof: InputProof,
    },
    /// Use the contract's configured default, encrypted internally.
    DefaultInternal,
}

/// Rejected raw constructor arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThresholdInitError {
    /// A threshold handle was given without a proof.
    #[error("threshold handle {handle} supplied without an input proof")]
    MissingProof {
        /// Short handle prefix.
        handle: String,
    },
}

impl ThresholdInit {
    /// Map ABI-style `(handle, proof)` arguments onto a path.
    ///
    /// Only the exact pair (empty handle, empty proof) selects the default.
    pub fn from_raw(
        handle: CiphertextHandle,
        proof: InputProof,
    ) -> Result<Self, ThresholdInitError> {
        match (handle.is_zero(), proof.is_empty()) {
            (true, true) => Ok(Self::DefaultInternal),
            (false, true) => Err(ThresholdInitError::MissingProof {
                handle: handle.short(),
            }),
            _ => Ok(Self::Authenticated { handle, proof }),
        }
    }

    /// Whether this is the unverified default path.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::DefaultInternal)
    }
}
