//! # Deploy and Protocol Subcommands
//!
//! - `ecs deploy [--threshold N] [--force]`: construct a contract. With
//!   `--threshold`, the deployer encrypts the value and the contract
//!   verifies it; without, the configured default is encrypted internally.
//! - `ecs protocol-id`: print the confidential protocol the node targets.

use anyhow::{bail, Result};
use clap::Args;
use ecs_contract::{ContractConfig, EncryptedCreditScore, EncryptedInputBuilder};
use ecs_core::{CiphertextHandle, ProtocolConfig};
use ecs_proof::InputProof;
use ecs_state::ThresholdInit;

use crate::config::CliConfig;
use crate::node::{LocalContract, LocalNode};
use crate::rejected;

/// Arguments for `ecs deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Initial threshold, encrypted and proven by the deployer.
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Replace an existing deployment in the state directory.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `ecs protocol-id`.
#[derive(Args, Debug)]
pub struct ProtocolIdArgs {}

/// Execute `ecs deploy`.
pub fn run_deploy(args: &DeployArgs, config: &CliConfig) -> Result<u8> {
    let node = LocalNode::open(config.clone());
    let contract = deploy(&node, args)?;
    node.save_deployment(&contract)?;
    println!(
        "OK: deployed contract {} on {} (protocol {})",
        contract.address(),
        contract.chain_id(),
        contract.confidential_protocol_id().map_err(rejected)?
    );
    Ok(0)
}

/// Construct a contract for `node` without persisting it.
pub fn deploy(node: &LocalNode, args: &DeployArgs) -> Result<LocalContract> {
    if node.is_deployed() && !args.force {
        bail!(
            "a contract is already deployed in {}; pass --force to replace it",
            node.dir().display()
        );
    }
    let config = node.config();
    let deployer = config.deployer_address()?;
    let contract_config = ContractConfig::with_nonce(deployer, config.chain(), node.next_nonce()?)
        .default_threshold(config.default_threshold);
    let backend = node.backend()?;

    let (handle, proof) = match args.threshold {
        Some(value) => {
            let attester = node.attester()?;
            let batch = EncryptedInputBuilder::new(
                &backend,
                &attester,
                node.binding(deployer, contract_config.address),
            )
            .add32(value)
            .encrypt()?;
            (batch.handles[0], batch.proof)
        }
        None => (CiphertextHandle::ZERO, InputProof::empty()),
    };
    let init = ThresholdInit::from_raw(handle, proof)?;

    EncryptedCreditScore::deploy(contract_config, init, backend, node.verifier()?).map_err(rejected)
}

/// Execute `ecs protocol-id`.
pub fn run_protocol_id(_args: &ProtocolIdArgs, config: &CliConfig) -> Result<u8> {
    let node = LocalNode::open(config.clone());
    let protocol_id = if node.is_deployed() {
        node.load()?.confidential_protocol_id().map_err(rejected)?
    } else {
        ProtocolConfig::for_chain(config.chain())?.protocol_id
    };
    println!("{protocol_id}");
    Ok(0)
}
