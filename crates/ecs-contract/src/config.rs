//! Contract instance configuration.

use ecs_core::{Address, ChainId};
use serde::{Deserialize, Serialize};

/// Threshold used when the contract is deployed without one.
pub const DEFAULT_THRESHOLD: u32 = 50;

/// Immutable parameters of one contract instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Instance address; the computation context for ACL checks.
    pub address: Address,
    /// Host network.
    pub chain_id: ChainId,
    /// Deployer. The only principal allowed to update the threshold.
    pub owner: Address,
    /// Plaintext threshold encrypted on the default construction path.
    pub default_threshold: u32,
}

impl ContractConfig {
    /// Config for the first contract deployed by `owner` on `chain_id`.
    pub fn new(owner: Address, chain_id: ChainId) -> Self {
        Self::with_nonce(owner, chain_id, 0)
    }

    /// Config for the contract deployed by `owner` at `nonce`.
    pub fn with_nonce(owner: Address, chain_id: ChainId, nonce: u64) -> Self {
        Self {
            address: Address::derive_contract(&owner, nonce),
            chain_id,
            owner,
            default_threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Override the default threshold.
    pub fn default_threshold(mut self, value: u32) -> Self {
        self.default_threshold = value;
        self
    }
}
