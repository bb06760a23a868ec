//! # Submission Subcommands
//!
//! - `ecs submit --user U --income I --debt-ratio D --repayment-score R`
//! - `ecs set-threshold --caller C --value V`
//!
//! Values are encrypted client-side as one batch under the caller's
//! binding, then passed to the contract with the batch proof.

use anyhow::Result;
use clap::Args;
use ecs_contract::EncryptedInputBuilder;
use ecs_state::AccountTransition;

use crate::config::{parse_principal, CliConfig};
use crate::node::{LocalContract, LocalNode};
use crate::rejected;

/// Arguments for `ecs submit`.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Submitting account (label or 0x address).
    #[arg(long)]
    pub user: String,

    /// Annual income.
    #[arg(long)]
    pub income: u32,

    /// Debt ratio, in percent.
    #[arg(long)]
    pub debt_ratio: u32,

    /// Repayment score, 0 to 100.
    #[arg(long)]
    pub repayment_score: u32,
}

/// Arguments for `ecs set-threshold`.
#[derive(Args, Debug)]
pub struct SetThresholdArgs {
    /// Calling account; defaults to the configured deployer.
    #[arg(long)]
    pub caller: Option<String>,

    /// New qualification threshold.
    #[arg(long)]
    pub value: u32,
}

/// Execute `ecs submit`.
pub fn run_submit(args: &SubmitArgs, config: &CliConfig) -> Result<u8> {
    let node = LocalNode::open(config.clone());
    let mut contract = node.load()?;
    let transition = submit(&node, &mut contract, args)?;
    node.save(&contract)?;
    println!(
        "OK: credit data submitted for {} ({})",
        transition.account,
        if transition.is_first() {
            "first submission"
        } else {
            "record replaced"
        }
    );
    Ok(0)
}

/// Encrypt and submit one set of credit data.
pub fn submit(
    node: &LocalNode,
    contract: &mut LocalContract,
    args: &SubmitArgs,
) -> Result<AccountTransition> {
    let user = parse_principal(&args.user)?;
    let attester = node.attester()?;
    let batch = EncryptedInputBuilder::new(
        contract.backend(),
        &attester,
        node.binding(user, contract.address()),
    )
    .add32(args.income)
    .add32(args.debt_ratio)
    .add32(args.repayment_score)
    .encrypt()?;

    contract
        .submit_credit_data(user, &batch.input(0)?, &batch.input(1)?, &batch.input(2)?)
        .map_err(rejected)
}

/// Execute `ecs set-threshold`.
pub fn run_set_threshold(args: &SetThresholdArgs, config: &CliConfig) -> Result<u8> {
    let node = LocalNode::open(config.clone());
    let mut contract = node.load()?;
    set_threshold(&node, &mut contract, args)?;
    node.save(&contract)?;
    println!("OK: threshold updated");
    Ok(0)
}

/// Encrypt and install a new threshold.
pub fn set_threshold(
    node: &LocalNode,
    contract: &mut LocalContract,
    args: &SetThresholdArgs,
) -> Result<()> {
    let caller = match &args.caller {
        Some(c) => parse_principal(c)?,
        None => node.config().deployer_address()?,
    };
    let attester = node.attester()?;
    let batch = EncryptedInputBuilder::new(
        contract.backend(),
        &attester,
        node.binding(caller, contract.address()),
    )
    .add32(args.value)
    .encrypt()?;
    let input = batch.input(0)?;
    contract
        .set_threshold(caller, input.handle, &input.proof)
        .map_err(rejected)
}
