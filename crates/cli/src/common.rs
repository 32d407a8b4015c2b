use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use claimdrop_merkle::{AllowlistEntry, AllowlistSnapshot, OddNodePolicy};
use claimdrop_service::{EntryInput, ServiceConfig};
use tracing::info;

/// Odd-layer policy as given on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PolicyArg {
    Duplicate,
    Promote,
}

impl From<PolicyArg> for OddNodePolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Duplicate => OddNodePolicy::Duplicate,
            PolicyArg::Promote => OddNodePolicy::Promote,
        }
    }
}

/// Picks the CLI override if present, else the configured policy.
pub fn resolve_policy(arg: Option<PolicyArg>, config: &ServiceConfig) -> OddNodePolicy {
    arg.map(Into::into)
        .unwrap_or(config.claims.odd_node_policy)
}

/// Parses allowlist JSON: an array of `{address, allowedAmount, dailyLimit}`.
pub fn parse_allowlist(json: &str) -> Result<Vec<AllowlistEntry>> {
    let rows: Vec<EntryInput> =
        serde_json::from_str(json).context("Failed to parse allowlist JSON")?;
    rows.iter()
        .enumerate()
        .map(|(i, row)| row.to_entry().with_context(|| format!("Invalid entry at index {i}")))
        .collect()
}

/// Reads an allowlist file and builds its snapshot.
pub fn load_snapshot(path: &Path, policy: OddNodePolicy) -> Result<AllowlistSnapshot> {
    info!("Reading allowlist from {}", path.display());
    let content = fs::read_to_string(path).context("Failed to read allowlist file")?;
    let entries = parse_allowlist(&content)?;
    info!("Building tree over {} entries ({policy:?})", entries.len());
    AllowlistSnapshot::build_with_policy(entries, policy).context("Failed to build tree")
}

/// Writes `content` to `path` via a temp file and rename.
pub fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path).context("Failed to create temp file")?;
    file.write_all(content)
        .context("Failed to write to temp file")?;
    file.flush().context("Failed to flush temp file")?;
    fs::rename(&temp_path, path).context("Failed to move temp file to output")?;
    Ok(())
}
