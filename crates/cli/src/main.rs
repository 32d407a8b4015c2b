//! Offline tooling for allowlist snapshots: build the tree, export proofs,
//! check a proof against a published root.
#![forbid(unsafe_code)]
#![allow(unreachable_pub)]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use claimdrop_service::ServiceConfig;
use tracing_subscriber::EnvFilter;

mod build_tree;
mod common;
mod prove;
mod verify;

#[derive(Parser, Debug)]
#[command(name = "claimdrop")]
#[command(about = "Merkle allowlist tools for reward claims", long_about = None)]
#[command(version)]
struct Cli {
    /// Service config (TOML).  Supplies the log filter and odd-node policy.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    BuildTree(build_tree::Cli),
    Prove(prove::Cli),
    Verify(verify::Cli),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .init();

    match cli.command {
        Commands::BuildTree(args) => build_tree::run(args, &config)?,
        Commands::Prove(args) => prove::run(&args, &config)?,
        Commands::Verify(args) => verify::run(&args)?,
    }

    Ok(())
}
