use std::path::PathBuf;

use alloy_primitives::hex;
use anyhow::{Context, Result};
use clap::Args;
use claimdrop_merkle::AllowlistSnapshot;
use claimdrop_service::{ProofResponse, ServiceConfig};
use serde::Serialize;
use tracing::info;

use crate::common::{PolicyArg, load_snapshot, resolve_policy, write_file_atomic};

/// Build the allowlist tree, write its root and every entry's proof.
#[derive(Args, Debug)]
pub struct Cli {
    /// Allowlist JSON file (array of `{address, allowedAmount, dailyLimit}`)
    #[arg(short, long)]
    pub input: PathBuf,

    /// File receiving the 0x-prefixed root
    #[arg(long)]
    pub root_output: PathBuf,

    /// File receiving the proofs JSON
    #[arg(long)]
    pub proofs_output: PathBuf,

    /// Reward period the snapshot is published for
    #[arg(long, default_value_t = 0)]
    pub period: u64,

    /// Odd-layer policy, overrides the config
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

/// Proofs file layout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofsFile {
    pub merkle_root: String,
    pub period: u64,
    pub entries: usize,
    pub proofs: Vec<ProofResponse>,
}

/// Renders the proof of every entry in `snapshot`.
pub fn proofs_file(snapshot: &AllowlistSnapshot, period: u64) -> Result<ProofsFile> {
    let root = snapshot.root();
    let proofs = snapshot
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let proof = snapshot.prove_inclusion(i)?;
            let leaf = snapshot.leaf(i)?;
            Ok(ProofResponse::new(period, entry, leaf, &proof, root))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProofsFile {
        merkle_root: hex::encode_prefixed(root),
        period,
        entries: snapshot.len(),
        proofs,
    })
}

pub fn run(args: Cli, config: &ServiceConfig) -> Result<()> {
    let policy = resolve_policy(args.policy, config);
    let snapshot = load_snapshot(&args.input, policy)?;

    let file = proofs_file(&snapshot, args.period)?;
    info!("Merkle root: {}", file.merkle_root);

    write_file_atomic(&args.root_output, file.merkle_root.as_bytes())
        .context("Failed to write root")?;
    info!("Root written to {}", args.root_output.display());

    let json = serde_json::to_string_pretty(&file).context("Failed to serialize proofs")?;
    write_file_atomic(&args.proofs_output, json.as_bytes()).context("Failed to write proofs")?;
    info!(
        "{} proofs written to {}",
        file.proofs.len(),
        args.proofs_output.display()
    );

    Ok(())
}
