//! # Confidential-Compute Protocol Table
//!
//! A contract instance targets one version of the confidential-compute
//! protocol. The table below is the single decision point for which host
//! networks provide that protocol; any other network is rejected before the
//! instance is constructed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::ChainId;

/// Identifier of a confidential-compute protocol deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolId(pub u64);

impl ProtocolId {
    /// Ethereum mainnet deployment.
    pub const ETHEREUM: ProtocolId = ProtocolId(1);
    /// Sepolia testnet deployment.
    pub const SEPOLIA: ProtocolId = ProtocolId(10_001);
    /// Local development deployment.
    pub const LOCAL: ProtocolId = ProtocolId(u64::MAX);
}

impl std::fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The host network does not provide the confidential-compute protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// No protocol deployment is known for this chain.
    #[error("confidential protocol unsupported on {chain_id}")]
    Unsupported {
        /// The rejected chain.
        chain_id: ChainId,
    },
}

/// Protocol parameters resolved for a host network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// The host network.
    pub chain_id: ChainId,
    /// The protocol deployment on that network.
    pub protocol_id: ProtocolId,
}

impl ProtocolConfig {
    /// Resolve the protocol deployment for a chain.
    pub fn for_chain(chain_id: ChainId) -> Result<Self, ProtocolError> {
        let protocol_id = match chain_id {
            ChainId::MAINNET => ProtocolId::ETHEREUM,
            ChainId::SEPOLIA => ProtocolId::SEPOLIA,
            ChainId::LOCAL => ProtocolId::LOCAL,
            other => return Err(ProtocolError::Unsupported { chain_id: other }),
        };
        Ok(Self {
            chain_id,
            protocol_id,
        })
    }
}
