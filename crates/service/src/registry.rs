//! Per-period allowlist snapshots kept alive for proving.

use std::collections::BTreeMap;
use std::sync::Arc;

use claimdrop_merkle::AllowlistSnapshot;
use tokio::sync::RwLock;

/// Holds the snapshot built for each period.
///
/// Snapshots are immutable; re-preparing a period supersedes the previous
/// snapshot rather than editing it.  Readers holding an `Arc` keep proving
/// against the tree they fetched.
#[derive(Debug, Default)]
pub struct SnapshotRegistry {
    snapshots: RwLock<BTreeMap<u64, Arc<AllowlistSnapshot>>>,
}

impl SnapshotRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `snapshot` for `period`, returning the one it replaces.
    pub async fn insert(
        &self,
        period: u64,
        snapshot: AllowlistSnapshot,
    ) -> Option<Arc<AllowlistSnapshot>> {
        self.snapshots
            .write()
            .await
            .insert(period, Arc::new(snapshot))
    }

    /// Snapshot registered for `period`.
    pub async fn get(&self, period: u64) -> Option<Arc<AllowlistSnapshot>> {
        self.snapshots.read().await.get(&period).cloned()
    }

    /// Highest registered period and its snapshot.
    pub async fn latest(&self) -> Option<(u64, Arc<AllowlistSnapshot>)> {
        self.snapshots
            .read()
            .await
            .last_key_value()
            .map(|(p, s)| (*p, s.clone()))
    }

    /// Registered periods, ascending.
    pub async fn periods(&self) -> Vec<u64> {
        self.snapshots.read().await.keys().copied().collect()
    }
}
