// src/types.rs

//! Core ledger value types.
//!
//! Amounts are integers in wei. Conversion to and from ETH strings is pure
//! decimal arithmetic with a fixed scale of 10^18, so `"0.1"` is exactly
//! `100000000000000000` wei and never a rounded float.

use crate::errors::{CoreError, Result};
use quill_crypto::hash::keccak_hash;
use quill_crypto::{ADDRESS_SIZE, HASH_SIZE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Amount in wei
pub type Wei = u128;

/// Number of decimal places between ETH and wei
pub const ETH_DECIMALS: usize = 18;

/// Wei in one ETH
pub const WEI_PER_ETH: Wei = 1_000_000_000_000_000_000;

/// Fractional digits shown when formatting a balance
pub const BALANCE_DISPLAY_DECIMALS: usize = 4;

/// 20-byte account address
///
/// Parses from `0x`-prefixed hex. All-lowercase and all-uppercase input is
/// accepted as-is; mixed case must carry a valid EIP-55 checksum. Always
/// displays in checksummed form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Wraps raw address bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// EIP-55 mixed-case checksum encoding, `0x`-prefixed
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak_hash(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                digest[i / 2] >> 4
            } else {
                digest[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| CoreError::InvalidAddress(format!("missing 0x prefix: {}", s)))?;

        if digits.len() != ADDRESS_SIZE * 2 {
            return Err(CoreError::InvalidAddress(format!(
                "expected {} hex digits, got {}",
                ADDRESS_SIZE * 2,
                digits.len()
            )));
        }

        let bytes = hex::decode(digits)
            .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", s, e)))?;
        let mut raw = [0u8; ADDRESS_SIZE];
        raw.copy_from_slice(&bytes);
        let address = Self(raw);

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(CoreError::InvalidAddress(format!("checksum mismatch: {}", s)));
        }

        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 32-byte transaction hash, the identifier the ledger returns on broadcast
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash(pub [u8; HASH_SIZE]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self)
    }
}

impl FromStr for TxHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        quill_crypto::hash::hex_to_hash(s)
            .map(TxHash)
            .map_err(|e| CoreError::Encode(format!("Invalid transaction hash '{}': {}", s, e)))
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a decimal ETH amount into wei
///
/// Accepts digits with an optional single decimal point (`"1"`, `"1.5"`,
/// `".25"`) and at most 18 fractional digits. Signs, exponents and
/// anything non-numeric are rejected.
///
/// # Example
/// ```
/// use quill_core::types::parse_ether;
///
/// assert_eq!(parse_ether("1.5").unwrap(), 1_500_000_000_000_000_000);
/// assert!(parse_ether("abc").is_err());
/// ```
pub fn parse_ether(input: &str) -> Result<Wei> {
    let s = input.trim();
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(CoreError::InvalidAmount(format!("'{}' is not a number", input)));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidAmount(format!("'{}' is not a number", input)));
    }
    if frac.len() > ETH_DECIMALS {
        return Err(CoreError::InvalidAmount(format!(
            "'{}' has more than {} decimal places",
            input, ETH_DECIMALS
        )));
    }

    let overflow = || CoreError::InvalidAmount(format!("'{}' is too large", input));

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<Wei>()
            .map_err(|_| overflow())?
            .checked_mul(WEI_PER_ETH)
            .ok_or_else(overflow)?
    };

    let frac_wei = if frac.is_empty() {
        0
    } else {
        let scale = 10u128.pow((ETH_DECIMALS - frac.len()) as u32);
        frac.parse::<Wei>().map_err(|_| overflow())? * scale
    };

    whole_wei.checked_add(frac_wei).ok_or_else(overflow)
}

/// Formats wei as ETH with at most `max_decimals` fractional digits
///
/// Extra digits are truncated, trailing zeros trimmed, and at least one
/// fractional digit is kept: `2 ETH` formats as `"2.0"`.
pub fn format_ether(wei: Wei, max_decimals: usize) -> String {
    let whole = wei / WEI_PER_ETH;
    let digits = format!("{:018}", wei % WEI_PER_ETH);

    let shown = digits[..max_decimals.min(ETH_DECIMALS)].trim_end_matches('0');
    if shown.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, shown)
    }
}

/// Formats a balance the way wallets display it (4 fractional digits)
pub fn format_balance(wei: Wei) -> String {
    format_ether(wei, BALANCE_DISPLAY_DECIMALS)
}
