//! # CLI Configuration
//!
//! Optional YAML file; every field has a default suitable for a local
//! development node.
//!
//! ```yaml
//! chain_id: 31337
//! deployer: deployer            # label or 0x-prefixed address
//! attester_seeds:
//!   - "0101010101010101010101010101010101010101010101010101010101010101"
//! attester_threshold: 1
//! default_threshold: 50
//! state_dir: .ecs
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ecs_contract::DEFAULT_THRESHOLD;
use ecs_core::{Address, ChainId};
use serde::{Deserialize, Serialize};

/// Local node settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Host network.
    pub chain_id: u64,
    /// Deployer principal, as a label or hex address.
    pub deployer: String,
    /// Hex-encoded 32-byte Ed25519 seeds of the input attesters.
    pub attester_seeds: Vec<String>,
    /// Attester signatures required per input.
    pub attester_threshold: usize,
    /// Threshold used when deploying without one.
    pub default_threshold: u32,
    /// Where contract state and the coprocessor store are kept.
    pub state_dir: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::LOCAL.value(),
            deployer: "deployer".to_string(),
            attester_seeds: vec!["01".repeat(32), "02".repeat(32)],
            attester_threshold: 2,
            default_threshold: DEFAULT_THRESHOLD,
            state_dir: PathBuf::from(".ecs"),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// The host network.
    pub fn chain(&self) -> ChainId {
        ChainId(self.chain_id)
    }

    /// The deployer address.
    pub fn deployer_address(&self) -> Result<Address> {
        parse_principal(&self.deployer)
    }
}

/// Parse a principal given as `0x`-prefixed hex or as a human label.
pub fn parse_principal(s: &str) -> Result<Address> {
    if s.starts_with("0x") {
        Address::from_hex(s).with_context(|| format!("invalid address {s}"))
    } else {
        Ok(Address::from_label(s))
    }
}
