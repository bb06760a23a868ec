//! # Principals and Chain Identity
//!
//! `Address` names every principal the permission manager knows about:
//! user accounts, the deployer, and contract instances themselves.
//! `ChainId` names the host network a contract instance and its
//! ciphertexts were minted under.
//!
//! ## Security Invariant
//!
//! Type-level distinction between the two prevents passing a chain id where
//! an account is expected when building proof bindings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::Sha256Accumulator;
use crate::error::CoreError;

/// A 20-byte account or contract address.
///
/// Serializes as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

/// Identifier of the host network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl Address {
    /// The zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse a 40-character hex address, with or without `0x`.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        crate::hex::decode_array::<20>(hex)
            .map(Self)
            .map_err(|e| CoreError::InvalidAddress(format!("{hex:?}: {e}")))
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", crate::hex::encode(&self.0))
    }

    /// Derive the address a contract deployed by `deployer` at `nonce`
    /// will live at.
    ///
    /// Clients use this to bind input proofs for the constructor before the
    /// instance exists.
    pub fn derive_contract(deployer: &Address, nonce: u64) -> Self {
        let mut acc = Sha256Accumulator::new();
        acc.update(b"ecs.contract-address.v1")
            .update(deployer.as_bytes())
            .update(&nonce.to_be_bytes());
        let digest = acc.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.0[12..]);
        Self(bytes)
    }

    /// Derive a deterministic address from a label. Used for named local
    /// accounts (`alice`, `bob`) in the CLI and in tests.
    pub fn from_label(label: &str) -> Self {
        let mut acc = Sha256Accumulator::new();
        acc.update(b"ecs.account-label.v1").update(label.as_bytes());
        let digest = acc.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.0[..20]);
        Self(bytes)
    }
}

impl std::str::FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl ChainId {
    /// Ethereum mainnet.
    pub const MAINNET: ChainId = ChainId(1);
    /// Sepolia testnet.
    pub const SEPOLIA: ChainId = ChainId(11_155_111);
    /// Local development node.
    pub const LOCAL: ChainId = ChainId(31_337);

    /// The numeric chain id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chain:{}", self.0)
    }
}
