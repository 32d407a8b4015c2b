use alloy_primitives::{Address, B256, U256};
use anyhow::{Result, bail};
use clap::Args;
use claimdrop_merkle::{AllowlistEntry, MerkleError, verify_entry};
use tracing::info;

/// Check a proof against a published root.
#[derive(Args, Debug)]
pub struct Cli {
    /// 0x-prefixed 32-byte root
    #[arg(long)]
    pub root: B256,

    /// Claimant address
    #[arg(short, long)]
    pub address: Address,

    /// Allowed amount (decimal or 0x hex)
    #[arg(long)]
    pub allowed_amount: U256,

    /// Daily limit (decimal or 0x hex)
    #[arg(long)]
    pub daily_limit: U256,

    /// Comma-separated sibling hashes, leaf first
    #[arg(long, value_delimiter = ',')]
    pub proof: Vec<B256>,
}

pub fn run(args: &Cli) -> Result<()> {
    let entry = AllowlistEntry::new(args.address, args.allowed_amount, args.daily_limit);
    let cohashes: Vec<[u8; 32]> = args.proof.iter().map(|h| h.0).collect();

    match verify_entry(&entry, &cohashes, &args.root.0) {
        Ok(()) => {
            info!("proof is valid");
            println!("valid");
            Ok(())
        }
        Err(MerkleError::ProofMismatch) => bail!("proof does not match root {}", args.root),
        Err(e) => Err(e.into()),
    }
}
