//! # ecs CLI entry point
//!
//! Parses arguments, installs logging, and dispatches to subcommand
//! handlers in the library.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ecs_cli::config::CliConfig;
use ecs_cli::deploy::{run_deploy, run_protocol_id, DeployArgs, ProtocolIdArgs};
use ecs_cli::query::{run_decrypt, run_status, DecryptArgs, StatusArgs};
use ecs_cli::submit::{run_set_threshold, run_submit, SetThresholdArgs, SubmitArgs};

/// Encrypted credit score engine on a local simulated node.
#[derive(Parser, Debug)]
#[command(name = "ecs", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured state directory.
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deploy a contract with an explicit or default threshold.
    Deploy(DeployArgs),

    /// Replace the qualification threshold (deployer only).
    SetThreshold(SetThresholdArgs),

    /// Encrypt and submit credit data for an account.
    Submit(SubmitArgs),

    /// Show stored handles for an account.
    Status(StatusArgs),

    /// Decrypt a stored value through the permission-checked relay.
    Decrypt(DecryptArgs),

    /// Print the confidential protocol id for the configured network.
    ProtocolId(ProtocolIdArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }
    tracing::debug!(state_dir = %config.state_dir.display(), "configuration loaded");

    let result = match cli.command {
        Commands::Deploy(args) => run_deploy(&args, &config),
        Commands::SetThreshold(args) => run_set_threshold(&args, &config),
        Commands::Submit(args) => run_submit(&args, &config),
        Commands::Status(args) => run_status(&args, &config),
        Commands::Decrypt(args) => run_decrypt(&args, &config),
        Commands::ProtocolId(args) => run_protocol_id(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
