//! # Local Node
//!
//! A single-process stand-in for the host chain and coprocessor. State
//! lives in JSON files under the configured state directory:
//!
//! - `contract.json`: the contract's `ContractState`
//! - `coprocessor.json`: the mock coprocessor's ciphertext store
//! - `node.json`: the deployer's nonce, so a replacement deployment gets a
//!   fresh contract address
//!
//! Files are rewritten only after a call succeeds, so a rejected call
//! leaves them untouched. Every file is staged in a temporary file first
//! and renamed into place; the store is published before the contract,
//! so `contract.json` never references a handle `coprocessor.json` lacks.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ecs_contract::{ContractState, EncryptedCreditScore};
use ecs_core::Address;
use ecs_crypto::Ed25519KeyPair;
use ecs_fhe::{MockBackend, MockStore};
use ecs_proof::{InputAttester, InputBinding, SignerSetVerifier};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::CliConfig;

const CONTRACT_FILE: &str = "contract.json";
const STORE_FILE: &str = "coprocessor.json";
const NODE_FILE: &str = "node.json";

/// Node bookkeeping that outlives a single deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct NodeRecord {
    /// Deployments made so far; also the nonce of the next one.
    deployments: u64,
}

/// The contract type the CLI drives.
pub type LocalContract = EncryptedCreditScore<MockBackend, SignerSetVerifier>;

/// Handle on the state directory.
#[derive(Debug, Clone)]
pub struct LocalNode {
    config: CliConfig,
    dir: PathBuf,
}

impl LocalNode {
    /// Node rooted at the configured state directory.
    pub fn open(config: CliConfig) -> Self {
        let dir = config.state_dir.clone();
        Self { config, dir }
    }

    /// The node configuration.
    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// The state directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a contract has been deployed here.
    pub fn is_deployed(&self) -> bool {
        self.dir.join(CONTRACT_FILE).is_file()
    }

    /// Attester keys from the configured seeds.
    pub fn attester(&self) -> Result<InputAttester> {
        let keys = self
            .config
            .attester_seeds
            .iter()
            .enumerate()
            .map(|(i, seed)| {
                Ed25519KeyPair::from_seed_hex(seed)
                    .with_context(|| format!("attester seed #{i} is invalid"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(InputAttester::new(keys))
    }

    /// Verifier trusting the configured attesters.
    pub fn verifier(&self) -> Result<SignerSetVerifier> {
        let attester = self.attester()?;
        SignerSetVerifier::new(attester.public_keys(), self.config.attester_threshold)
            .context("invalid attester configuration")
    }

    /// Coprocessor resumed from disk, or empty.
    pub fn backend(&self) -> Result<MockBackend> {
        let path = self.dir.join(STORE_FILE);
        let store: MockStore = if path.is_file() {
            read_json(&path)?
        } else {
            MockStore::default()
        };
        Ok(MockBackend::from_store(self.config.chain(), store))
    }

    /// Binding for inputs `user` prepares for `contract`.
    pub fn binding(&self, user: Address, contract: Address) -> InputBinding {
        InputBinding {
            user,
            contract,
            chain_id: self.config.chain(),
        }
    }

    /// Load the deployed contract.
    pub fn load(&self) -> Result<LocalContract> {
        if !self.is_deployed() {
            bail!(
                "no contract deployed in {}; run `ecs deploy` first",
                self.dir.display()
            );
        }
        let state: ContractState = read_json(&self.dir.join(CONTRACT_FILE))?;
        Ok(EncryptedCreditScore::from_state(
            state,
            self.backend()?,
            self.verifier()?,
        ))
    }

    /// Nonce for the next deployment.
    pub fn next_nonce(&self) -> Result<u64> {
        Ok(self.record()?.deployments)
    }

    /// Persist contract state and the coprocessor store.
    pub fn save(&self, contract: &LocalContract) -> Result<()> {
        self.publish(contract, None)
    }

    /// Persist a freshly deployed contract and advance the deploy nonce.
    pub fn save_deployment(&self, contract: &LocalContract) -> Result<()> {
        let record = NodeRecord {
            deployments: self.next_nonce()? + 1,
        };
        self.publish(contract, Some(record))
    }

    fn record(&self) -> Result<NodeRecord> {
        let path = self.dir.join(NODE_FILE);
        if path.is_file() {
            read_json(&path)
        } else {
            Ok(NodeRecord::default())
        }
    }

    fn publish(&self, contract: &LocalContract, record: Option<NodeRecord>) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        let mut staged = vec![(
            stage_json(&self.dir, &contract.backend().snapshot())?,
            STORE_FILE,
        )];
        if let Some(record) = record {
            staged.push((stage_json(&self.dir, &record)?, NODE_FILE));
        }
        staged.push((stage_json(&self.dir, contract.state())?, CONTRACT_FILE));

        for (file, name) in staged {
            let path = self.dir.join(name);
            file.persist(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        tracing::debug!(dir = %self.dir.display(), "node state saved");
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn stage_json<T: Serialize>(dir: &Path, value: &T) -> Result<NamedTempFile> {
    let json = serde_json::to_string_pretty(value)?;
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    file.write_all(json.as_bytes()).context("failed to write temp file")?;
    file.as_file().sync_all().context("failed to sync temp file")?;
    Ok(file)
}
