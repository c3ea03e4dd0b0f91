// src/hash.rs

//! Keccak-256 hashing.
//!
//! Keccak-256 is the ledger's hash function: it derives account addresses
//! from public keys, produces transaction signing hashes and transaction
//! ids, and drives EIP-55 checksum casing.

use crate::errors::{CryptoError, Result};
use crate::HASH_SIZE;
use sha3::{Digest, Keccak256};

/// Computes Keccak-256 hash of input data
///
/// # Example
/// ```
/// use quill_crypto::hash::keccak_hash;
///
/// let hash = keccak_hash(b"");
/// assert_eq!(
///     hex::encode(hash),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak_hash(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&result[..HASH_SIZE]);
    out
}

/// Parses a hexadecimal string (with or without `0x`) to a hash
pub fn hex_to_hash(hex_str: &str) -> Result<[u8; HASH_SIZE]> {
    let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    if digits.len() != HASH_SIZE * 2 {
        return Err(CryptoError::InvalidInput(format!(
            "Invalid hex length: expected {}, got {}",
            HASH_SIZE * 2,
            digits.len()
        )));
    }

    let bytes = hex::decode(digits)
        .map_err(|e| CryptoError::InvalidInput(format!("Hex decode failed: {}", e)))?;

    let mut hash = [0u8; HASH_SIZE];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_known_vector() {
        assert_eq!(
            hex::encode(keccak_hash(b"hello")),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_keccak_deterministic() {
        assert_eq!(keccak_hash(b"test data"), keccak_hash(b"test data"));
        assert_ne!(keccak_hash(b"data1"), keccak_hash(b"data2"));
    }

    #[test]
    fn test_hex_to_hash() {
        let original = keccak_hash(b"test");
        let hex = hex::encode(original);

        assert_eq!(hex_to_hash(&hex).unwrap(), original);
        assert_eq!(hex_to_hash(&format!("0x{}", hex)).unwrap(), original);
    }

    #[test]
    fn test_hex_to_hash_invalid() {
        assert!(hex_to_hash("abcd").is_err());
        assert!(hex_to_hash(&"g".repeat(64)).is_err());
    }
}
