//! # Query Subcommands
//!
//! - `ecs status --user U`: existence flag and stored handles (never
//!   plaintext)
//! - `ecs decrypt --user U --field F [--as R]`: decrypt through the relay,
//!   which requires grants for both the requester and the contract

use anyhow::Result;
use clap::{Args, ValueEnum};
use ecs_contract::DecryptionRelay;
use ecs_core::{Address, CiphertextHandle};
use ecs_fhe::Plaintext;

use crate::config::{parse_principal, CliConfig};
use crate::node::{LocalContract, LocalNode};
use crate::rejected;

/// Arguments for `ecs status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Account to inspect.
    #[arg(long)]
    pub user: String,
}

/// A stored encrypted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    /// Current score.
    Score,
    /// Prior score used by the latest submission.
    LastScore,
    /// Qualification flag.
    Qualification,
    /// Global threshold.
    Threshold,
}

/// Arguments for `ecs decrypt`.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Account whose value is read.
    #[arg(long)]
    pub user: String,

    /// Which value to decrypt.
    #[arg(long, value_enum, default_value = "score")]
    pub field: Field,

    /// Requesting principal; defaults to `--user`.
    #[arg(long = "as")]
    pub requester: Option<String>,
}

/// Execute `ecs status`.
pub fn run_status(args: &StatusArgs, config: &CliConfig) -> Result<u8> {
    let node = LocalNode::open(config.clone());
    let contract = node.load()?;
    let user = parse_principal(&args.user)?;

    println!("Contract: {}", contract.address());
    println!("  Chain: {}", contract.chain_id());
    println!("  Threshold: {}", contract.get_threshold());
    println!("Account: {user}");
    println!("  Has credit data: {}", contract.has_credit_data(&user));
    if contract.has_credit_data(&user) {
        println!("  Score: {}", handle_of(&contract, user, Field::Score)?);
        println!("  Last score: {}", handle_of(&contract, user, Field::LastScore)?);
        println!(
            "  Qualification: {}",
            handle_of(&contract, user, Field::Qualification)?
        );
    }
    Ok(0)
}

/// Execute `ecs decrypt`.
pub fn run_decrypt(args: &DecryptArgs, config: &CliConfig) -> Result<u8> {
    let node = LocalNode::open(config.clone());
    let contract = node.load()?;
    let user = parse_principal(&args.user)?;
    let requester = match &args.requester {
        Some(r) => parse_principal(r)?,
        None => user,
    };
    println!("{}", decrypt(&contract, user, args.field, requester)?);
    Ok(0)
}

/// Handle of `field` for `user`.
pub fn handle_of(contract: &LocalContract, user: Address, field: Field) -> Result<CiphertextHandle> {
    let handle: CiphertextHandle = match field {
        Field::Score => contract.get_credit_score(&user).map_err(rejected)?.into(),
        Field::LastScore => contract.get_last_score(&user).map_err(rejected)?.into(),
        Field::Qualification => contract
            .get_qualification_status(&user)
            .map_err(rejected)?
            .into(),
        Field::Threshold => contract.get_threshold().into(),
    };
    Ok(handle)
}

/// Decrypt `field` of `user` on behalf of `requester`.
pub fn decrypt(
    contract: &LocalContract,
    user: Address,
    field: Field,
    requester: Address,
) -> Result<Plaintext> {
    let handle = handle_of(contract, user, field)?;
    let relay = DecryptionRelay::new(contract.backend(), contract.acl(), contract.address());
    Ok(relay.user_decrypt(handle, requester)?)
}
