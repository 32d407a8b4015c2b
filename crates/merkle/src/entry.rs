//! Allowlist entries and their canonical leaf encoding.

use std::str::FromStr;

use alloy_primitives::{Address, U256};

use crate::error::MerkleError;
use crate::hasher::MerkleHasher;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Width of each encoded amount field in bytes.
pub const AMOUNT_LEN: usize = 32;

/// Length of an encoded leaf preimage.
pub const LEAF_ENCODING_LEN: usize = ADDRESS_LEN + 2 * AMOUNT_LEN;

/// One row of an allowlist snapshot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AllowlistEntry {
    address: Address,
    allowed_amount: U256,
    daily_limit: U256,
}

impl AllowlistEntry {
    /// Constructs a new entry from typed parts.
    pub fn new(address: Address, allowed_amount: U256, daily_limit: U256) -> Self {
        Self {
            address,
            allowed_amount,
            daily_limit,
        }
    }

    /// Constructs an entry from raw byte slices.
    ///
    /// The address must be exactly 20 bytes.  Amounts are big-endian and may
    /// be any length as long as the value fits in 256 bits.
    pub fn from_be_slices(
        address: &[u8],
        allowed_amount: &[u8],
        daily_limit: &[u8],
    ) -> Result<Self, MerkleError> {
        let address: [u8; ADDRESS_LEN] = address.try_into().map_err(|_| {
            MerkleError::InvalidEntry(format!(
                "address must be {ADDRESS_LEN} bytes, got {}",
                address.len()
            ))
        })?;

        Ok(Self::new(
            Address::from(address),
            amount_from_be_slice("allowedAmount", allowed_amount)?,
            amount_from_be_slice("dailyLimit", daily_limit)?,
        ))
    }

    /// Parses an entry from its textual form.
    ///
    /// The address is 40 hex chars with or without `0x`, in any case.  Amounts
    /// are decimal, or hex with a `0x` prefix.
    pub fn parse(
        address: &str,
        allowed_amount: &str,
        daily_limit: &str,
    ) -> Result<Self, MerkleError> {
        Ok(Self::new(
            parse_address(address)?,
            parse_amount("allowedAmount", allowed_amount)?,
            parse_amount("dailyLimit", daily_limit)?,
        ))
    }

    /// Account the entry is for.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Total amount the account may claim.
    pub fn allowed_amount(&self) -> U256 {
        self.allowed_amount
    }

    /// Per-day claim limit.
    pub fn daily_limit(&self) -> U256 {
        self.daily_limit
    }

    /// Encodes the entry as `address || be32(allowedAmount) || be32(dailyLimit)`.
    ///
    /// Same bytes as Solidity's `abi.encodePacked(address, uint256, uint256)`.
    pub fn encode(&self) -> [u8; LEAF_ENCODING_LEN] {
        let mut buf = [0; LEAF_ENCODING_LEN];
        buf[..ADDRESS_LEN].copy_from_slice(self.address.as_slice());
        buf[ADDRESS_LEN..ADDRESS_LEN + AMOUNT_LEN]
            .copy_from_slice(&self.allowed_amount.to_be_bytes::<AMOUNT_LEN>());
        buf[ADDRESS_LEN + AMOUNT_LEN..]
            .copy_from_slice(&self.daily_limit.to_be_bytes::<AMOUNT_LEN>());
        buf
    }

    /// Computes the leaf hash for this entry with the given hasher.
    pub fn leaf_hash<MH: MerkleHasher>(&self) -> MH::Hash {
        MH::hash_leaf(&self.encode())
    }
}

/// Encodes an entry into its canonical leaf preimage.
pub fn encode_leaf(entry: &AllowlistEntry) -> [u8; LEAF_ENCODING_LEN] {
    entry.encode()
}

/// Parses a 20-byte hex address.
pub fn parse_address(s: &str) -> Result<Address, MerkleError> {
    Address::from_str(s.trim())
        .map_err(|e| MerkleError::InvalidEntry(format!("address {s:?}: {e}")))
}

fn parse_amount(field: &str, s: &str) -> Result<U256, MerkleError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(MerkleError::InvalidEntry(format!("{field} is empty")));
    }

    U256::from_str(s).map_err(|e| MerkleError::InvalidEntry(format!("{field} {s:?}: {e}")))
}

fn amount_from_be_slice(field: &str, buf: &[u8]) -> Result<U256, MerkleError> {
    U256::try_from_be_slice(buf)
        .ok_or_else(|| MerkleError::InvalidEntry(format!("{field} exceeds 256 bits")))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256, hex};

    use super::*;
    use crate::Keccak256Hasher;

    fn sample() -> AllowlistEntry {
        AllowlistEntry::new(
            Address::repeat_byte(0x11),
            U256::from(1000u64),
            U256::from(100u64),
        )
    }

    #[test]
    fn encoding_layout() {
        let buf = encode_leaf(&sample());
        assert_eq!(buf.len(), 84);
        assert_eq!(&buf[..20], &[0x11; 20]);

        let mut allowed = [0u8; 32];
        allowed[30..].copy_from_slice(&1000u16.to_be_bytes());
        assert_eq!(&buf[20..52], &allowed);

        let mut daily = [0u8; 32];
        daily[31] = 100;
        assert_eq!(&buf[52..], &daily);
    }

    #[test]
    fn leaf_hash_matches_packed_keccak() {
        let leaf = sample().leaf_hash::<Keccak256Hasher>();
        assert_eq!(
            leaf,
            hex!("9e896194c9957ee89d9bbb5d2f9774f562ab33b5c41be264f8dbc824e345143e")
        );
    }

    #[test]
    fn parse_accepts_prefixes_and_case() {
        let a = AllowlistEntry::parse(
            "0x1111111111111111111111111111111111111111",
            "1000",
            "0x64",
        )
        .unwrap();
        let b = AllowlistEntry::parse(
            " 1111111111111111111111111111111111111111 ",
            "0x3e8",
            "100",
        )
        .unwrap();
        assert_eq!(a, sample());
        assert_eq!(b, sample());

        let upper = AllowlistEntry::parse(
            "0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD",
            "1",
            "1",
        )
        .unwrap();
        let lower = AllowlistEntry::parse(
            "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd",
            "1",
            "1",
        )
        .unwrap();
        assert_eq!(upper.encode(), lower.encode());
    }

    #[test]
    fn parse_rejects_bad_input() {
        let addr = "0x1111111111111111111111111111111111111111";
        assert!(matches!(
            AllowlistEntry::parse("0x1234", "1", "1"),
            Err(MerkleError::InvalidEntry(_))
        ));
        assert!(matches!(
            AllowlistEntry::parse("0xzz11111111111111111111111111111111111111", "1", "1"),
            Err(MerkleError::InvalidEntry(_))
        ));
        assert!(matches!(
            AllowlistEntry::parse(addr, "", "1"),
            Err(MerkleError::InvalidEntry(_))
        ));
        assert!(matches!(
            AllowlistEntry::parse(addr, "-5", "1"),
            Err(MerkleError::InvalidEntry(_))
        ));

        // 2^256 does not fit.
        let too_big =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(
            AllowlistEntry::parse(addr, "1", too_big),
            Err(MerkleError::InvalidEntry(_))
        ));
    }

    #[test]
    fn max_amount_roundtrips_through_encoding() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let e = AllowlistEntry::parse("0x1111111111111111111111111111111111111111", max, max)
            .unwrap();
        assert_eq!(e.allowed_amount(), U256::MAX);
        assert_eq!(&e.encode()[20..], &[0xff; 64]);
    }

    #[test]
    fn from_be_slices_checks_widths() {
        let e = AllowlistEntry::from_be_slices(&[0x11; 20], &[0x03, 0xe8], &[100]).unwrap();
        assert_eq!(e, sample());

        let err = AllowlistEntry::from_be_slices(&[0x11; 19], &[1], &[1]).unwrap_err();
        assert!(matches!(err, MerkleError::InvalidEntry(_)));
        let err = AllowlistEntry::from_be_slices(&[0x11; 21], &[1], &[1]).unwrap_err();
        assert!(matches!(err, MerkleError::InvalidEntry(_)));

        let mut wide = [0u8; 33];
        wide[0] = 1;
        let err = AllowlistEntry::from_be_slices(&[0x11; 20], &wide, &[1]).unwrap_err();
        assert!(matches!(err, MerkleError::InvalidEntry(_)));
    }
}
