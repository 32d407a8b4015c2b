use std::path::PathBuf;

use alloy_primitives::Address;
use anyhow::{Context, Result, anyhow};
use clap::Args;
use claimdrop_service::{ProofResponse, ServiceConfig};
use tracing::debug;

use crate::common::{PolicyArg, load_snapshot, resolve_policy};

/// Print the inclusion proof for one address.
#[derive(Args, Debug)]
pub struct Cli {
    /// Allowlist JSON file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Address to prove
    #[arg(short, long)]
    pub address: Address,

    /// Reward period stamped on the proof
    #[arg(long, default_value_t = 0)]
    pub period: u64,

    /// Odd-layer policy, overrides the config
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

pub fn run(args: &Cli, config: &ServiceConfig) -> Result<()> {
    let policy = resolve_policy(args.policy, config);
    let snapshot = load_snapshot(&args.input, policy)?;

    let index = snapshot
        .index_of(args.address)
        .ok_or_else(|| anyhow!("{} is not in the allowlist", args.address))?;
    let entry = snapshot.entries()[index];
    let proof = snapshot.prove_inclusion(index)?;
    let leaf = snapshot.leaf(index)?;
    debug!(%index, depth = proof.cohashes().len(), "generated proof");

    let response = ProofResponse::new(args.period, &entry, leaf, &proof, snapshot.root());
    let json = serde_json::to_string_pretty(&response).context("Failed to serialize proof")?;
    println!("{json}");

    Ok(())
}
