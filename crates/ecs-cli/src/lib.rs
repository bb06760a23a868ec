//! # ecs-cli — Encrypted Credit Score CLI
//!
//! Drives a contract on a local simulated node whose state lives in a
//! directory (see `node.rs`).
//!
//! ## Subcommands
//!
//! ```bash
//! ecs deploy [--threshold 60]
//! ecs submit --user alice --income 50000 --debt-ratio 30 --repayment-score 85
//! ecs status --user alice
//! ecs decrypt --user alice --field qualification
//! ecs set-threshold --value 70
//! ecs protocol-id
//! ```

pub mod config;
pub mod deploy;
pub mod node;
pub mod query;
pub mod submit;

use ecs_contract::ScoreError;

/// Render a contract rejection with its stable kind name.
pub fn rejected(err: ScoreError) -> anyhow::Error {
    anyhow::anyhow!("{}: {err}", err.kind())
}
