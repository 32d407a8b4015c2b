//! Request and response bodies of the claim handlers.
//!
//! Numbers that may exceed 64 bits travel as strings (decimal or `0x` hex),
//! hashes as `0x`-prefixed hex.

use std::str::FromStr;

use alloy_primitives::{B256, hex};
use claimdrop_merkle::{AllowlistEntry, Hash32, MerkleError, MerkleProof};
use serde::{Deserialize, Serialize};

use crate::errors::ClaimError;
use crate::ports::ClaimRecord;

/// Body of a claim request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    /// Claimant; falls back to the `x-user-address` header when absent.
    #[serde(default)]
    pub address: Option<String>,
    /// Claim period.
    pub period: u64,
    /// Amount to claim.
    pub amount: String,
    /// Allowlisted total, as in the leaf.
    pub allowed_amount: String,
    /// Allowlisted daily limit, as in the leaf.
    pub daily_limit: String,
    /// Sibling hashes, leaf first.
    #[serde(default)]
    pub merkle_proof: Vec<String>,
}

/// Body of a root update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRootRequest {
    /// Period the root is published for.
    #[serde(default)]
    pub period: u64,
    /// `0x`-prefixed 32-byte root; required.
    #[serde(default)]
    pub merkle_root: Option<String>,
}

/// Body of an admin role grant/revoke.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    /// Account to grant to or revoke from; required.
    #[serde(default)]
    pub account: Option<String>,
}

/// One allowlist row in its textual form, as found in allowlist files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    /// `0x`-prefixed 20-byte address.
    pub address: String,
    /// Decimal or `0x` hex.
    pub allowed_amount: String,
    /// Decimal or `0x` hex.
    pub daily_limit: String,
}

impl EntryInput {
    /// Parses into a typed entry.
    pub fn to_entry(&self) -> Result<AllowlistEntry, MerkleError> {
        AllowlistEntry::parse(&self.address, &self.allowed_amount, &self.daily_limit)
    }
}

impl From<&AllowlistEntry> for EntryInput {
    fn from(e: &AllowlistEntry) -> Self {
        Self {
            address: e.address().to_string(),
            allowed_amount: e.allowed_amount().to_string(),
            daily_limit: e.daily_limit().to_string(),
        }
    }
}

/// Body of a snapshot preparation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareRequest {
    /// Period the snapshot is for.
    pub period: u64,
    /// Allowlist rows, in leaf order.
    pub entries: Vec<EntryInput>,
}

/// Result of a contract-forwarding handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    /// Human-readable outcome.
    pub message: String,
    /// `0x`-prefixed transaction hash.
    pub transaction_hash: String,
}

impl TxResponse {
    pub(crate) fn new(message: impl Into<String>, tx_hash: B256) -> Self {
        Self {
            message: message.into(),
            transaction_hash: hex::encode_prefixed(tx_hash),
        }
    }
}

/// Result of preparing and publishing a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Period the snapshot is for.
    pub period: u64,
    /// Published root.
    pub merkle_root: String,
    /// Number of leaves.
    pub entries: usize,
    /// Hash of the root update transaction.
    pub transaction_hash: String,
}

/// Inclusion proof handed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
    /// Period of the snapshot.
    pub period: u64,
    /// Leaf index in the snapshot.
    pub index: u64,
    /// The proven entry, flattened into the body.
    #[serde(flatten)]
    pub entry: EntryInput,
    /// Leaf hash.
    pub leaf: String,
    /// Sibling hashes, leaf first.
    pub merkle_proof: Vec<String>,
    /// Root of the snapshot.
    pub merkle_root: String,
}

impl ProofResponse {
    /// Renders a proof for `entry` in a snapshot with `root`.
    pub fn new(
        period: u64,
        entry: &AllowlistEntry,
        leaf: Hash32,
        proof: &MerkleProof<Hash32>,
        root: Hash32,
    ) -> Self {
        Self {
            period,
            index: proof.index(),
            entry: entry.into(),
            leaf: hex::encode_prefixed(leaf),
            merkle_proof: proof.cohashes().iter().map(hex::encode_prefixed).collect(),
            merkle_root: hex::encode_prefixed(root),
        }
    }
}

/// One recorded claim in a user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    /// Claim period.
    pub period: u64,
    /// Amount paid out, decimal.
    pub amount: String,
    /// RFC 3339 timestamp.
    pub claimed_at: String,
}

impl From<&ClaimRecord> for ClaimResponse {
    fn from(r: &ClaimRecord) -> Self {
        Self {
            period: r.period,
            amount: r.amount.to_string(),
            claimed_at: r.claimed_at.to_rfc3339(),
        }
    }
}

/// Parses a 32-byte hash from hex.
pub fn parse_hash(field: &str, s: &str) -> Result<B256, ClaimError> {
    B256::from_str(s.trim()).map_err(|e| ClaimError::InvalidRequest(format!("{field} {s:?}: {e}")))
}

/// Parses a list of 32-byte hashes from hex.
pub fn parse_proof(items: &[String]) -> Result<Vec<B256>, ClaimError> {
    items.iter().map(|s| parse_hash("merkleProof", s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_request_accepts_camel_case() {
        let req: ClaimRequest = serde_json::from_str(
            r#"{
                "period": 3,
                "amount": "10",
                "allowedAmount": "100",
                "dailyLimit": "0x0a",
                "merkleProof": ["0x0101010101010101010101010101010101010101010101010101010101010101"]
            }"#,
        )
        .unwrap();
        assert_eq!(req.address, None);
        assert_eq!(req.period, 3);
        assert_eq!(parse_proof(&req.merkle_proof).unwrap(), vec![B256::repeat_byte(1)]);
    }

    #[test]
    fn bad_proof_element_is_invalid_request() {
        let err = parse_proof(&["0x1234".to_owned()]).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidRequest(_)));
    }

    #[test]
    fn update_root_request_defaults_period() {
        let req: UpdateRootRequest =
            serde_json::from_str(r#"{"merkleRoot": "0x00"}"#).unwrap();
        assert_eq!(req.period, 0);

        let req: UpdateRootRequest =
            serde_json::from_str(r#"{"period": 4, "merkleRoot": "0x00"}"#).unwrap();
        assert_eq!(req.period, 4);
    }

    #[test]
    fn claim_response_shape() {
        let record = ClaimRecord {
            id: 1,
            user_address: alloy_primitives::Address::repeat_byte(1),
            period: 2,
            amount: alloy_primitives::U256::from(150u64),
            claimed_at: chrono::DateTime::from_timestamp(0, 0).unwrap(),
        };
        let json = serde_json::to_value(ClaimResponse::from(&record)).unwrap();
        assert_eq!(json["period"], 2);
        assert_eq!(json["amount"], "150");
        assert_eq!(json["claimedAt"], "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn tx_response_shape() {
        let resp = TxResponse::new("Contract paused.", B256::repeat_byte(0xab));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["message"], "Contract paused.");
        assert_eq!(
            json["transactionHash"],
            "0xabababababababababababababababababababababababababababababababab"
        );
    }
}
