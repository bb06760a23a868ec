//! # Decryption Relay
//!
//! Stands in for the off-chain service that turns a grant into a
//! delivered plaintext. A request succeeds only when both the requester and
//! the contract hold a grant on the handle.

use ecs_acl::Acl;
use ecs_core::{Address, CiphertextHandle};
use ecs_fhe::{BackendError, Decryptor, Plaintext};
use thiserror::Error;

/// Relay refusals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The requester holds no grant.
    #[error("{requester} may not decrypt {handle}")]
    RequesterNotAllowed {
        /// The requester.
        requester: Address,
        /// Short handle prefix.
        handle: String,
    },

    /// The contract holds no grant, so the handle is not one it vouches for.
    #[error("contract {contract} holds no grant on {handle}")]
    ContractNotAllowed {
        /// The contract.
        contract: Address,
        /// Short handle prefix.
        handle: String,
    },

    /// The backend could not decrypt.
    #[error("decryption failed: {0}")]
    Backend(#[from] BackendError),
}

/// Permission-checked decryption for one contract instance.
pub struct DecryptionRelay<'a, D: Decryptor + ?Sized> {
    decryptor: &'a D,
    acl: &'a Acl,
    contract: Address,
}

impl<'a, D: Decryptor + ?Sized> DecryptionRelay<'a, D> {
    /// Relay for `contract` reading grants from `acl`.
    pub fn new(decryptor: &'a D, acl: &'a Acl, contract: Address) -> Self {
        Self {
            decryptor,
            acl,
            contract,
        }
    }

    /// Decrypt `handle` on behalf of `requester`.
    pub fn user_decrypt(
        &self,
        handle: impl Into<CiphertextHandle>,
        requester: Address,
    ) -> Result<Plaintext, RelayError> {
        let handle = handle.into();
        if !self.acl.is_allowed(&handle, &requester) {
            tracing::warn!(%requester, handle = %handle.short(), "decryption refused");
            return Err(RelayError::RequesterNotAllowed {
                requester,
                handle: handle.short(),
            });
        }
        if !self.acl.is_allowed(&handle, &self.contract) {
            return Err(RelayError::ContractNotAllowed {
                contract: self.contract,
                handle: handle.short(),
            });
        }
        Ok(self.decryptor.decrypt(&handle)?)
    }
}
