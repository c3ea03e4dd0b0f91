// src/keys.rs

//! secp256k1 account keys and recoverable ECDSA signatures.
//!
//! Curve arithmetic comes from `k256`. An account address is the last 20
//! bytes of the Keccak-256 hash of the uncompressed public key (without
//! the `0x04` prefix).

use crate::errors::{CryptoError, Result};
use crate::hash::keccak_hash;
use crate::{ADDRESS_SIZE, HASH_SIZE, PRIVATE_KEY_SIZE};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

/// secp256k1 private key
///
/// The inner `SigningKey` zeroizes its scalar on drop. `Debug` never
/// prints key material.
#[derive(Clone)]
pub struct SecretKey {
    inner: SigningKey,
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

/// ECDSA signature with its public key recovery id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// `r` component, big-endian
    pub r: [u8; 32],
    /// `s` component, big-endian (low-s normalized)
    pub s: [u8; 32],
    /// Recovery id (0 or 1)
    pub recovery_id: u8,
}

impl SecretKey {
    /// Parses a 32-byte big-endian scalar
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "Invalid private key size: expected {}, got {}",
                PRIVATE_KEY_SIZE,
                bytes.len()
            )));
        }

        let inner = SigningKey::from_slice(bytes)
            .map_err(|_| CryptoError::InvalidKey("Scalar out of range".to_string()))?;

        Ok(Self { inner })
    }

    pub(crate) fn from_signing_key(inner: SigningKey) -> Self {
        Self { inner }
    }

    /// Account address controlled by this key
    pub fn address(&self) -> [u8; ADDRESS_SIZE] {
        address_from_verifying_key(self.inner.verifying_key())
    }

    /// Signs a 32-byte message hash
    pub fn sign_prehash(&self, hash: &[u8; HASH_SIZE]) -> Result<RecoverableSignature> {
        let (signature, recovery_id) = self
            .inner
            .sign_prehash_recoverable(hash)
            .map_err(|e| CryptoError::SignatureError(format!("Signing failed: {}", e)))?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(RecoverableSignature {
            r,
            s,
            recovery_id: recovery_id.to_byte(),
        })
    }
}

/// Recovers the signer's address from a message hash and signature
pub fn recover_address(
    hash: &[u8; HASH_SIZE],
    signature: &RecoverableSignature,
) -> Result<[u8; ADDRESS_SIZE]> {
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(&signature.r);
    bytes[32..].copy_from_slice(&signature.s);

    let sig = Signature::from_slice(&bytes)
        .map_err(|e| CryptoError::SignatureError(format!("Invalid signature: {}", e)))?;
    let recid = RecoveryId::from_byte(signature.recovery_id)
        .ok_or_else(|| CryptoError::SignatureError("Invalid recovery id".to_string()))?;

    let key = VerifyingKey::recover_from_prehash(hash, &sig, recid)
        .map_err(|e| CryptoError::SignatureError(format!("Recovery failed: {}", e)))?;

    Ok(address_from_verifying_key(&key))
}

fn address_from_verifying_key(key: &VerifyingKey) -> [u8; ADDRESS_SIZE] {
    let point = key.to_encoded_point(false);
    let hash = keccak_hash(&point.as_bytes()[1..]);

    let mut address = [0u8; ADDRESS_SIZE];
    address.copy_from_slice(&hash[HASH_SIZE - ADDRESS_SIZE..]);
    address
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key (Hardhat account #0)
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "f39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn dev_key() -> SecretKey {
        SecretKey::from_bytes(&hex::decode(DEV_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_address_from_known_key() {
        assert_eq!(hex::encode(dev_key().address()), DEV_ADDRESS);
    }

    #[test]
    fn test_invalid_key_size() {
        let result = SecretKey::from_bytes(&[1u8; 31]);
        assert!(matches!(result, Err(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn test_zero_key_rejected() {
        assert!(SecretKey::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_sign_and_recover() {
        let key = dev_key();
        let hash = keccak_hash(b"message");

        let signature = key.sign_prehash(&hash).unwrap();
        assert!(signature.recovery_id <= 1);

        let recovered = recover_address(&hash, &signature).unwrap();
        assert_eq!(recovered, key.address());
    }

    #[test]
    fn test_signature_deterministic() {
        let key = dev_key();
        let hash = keccak_hash(b"deterministic test");

        assert_eq!(key.sign_prehash(&hash).unwrap(), key.sign_prehash(&hash).unwrap());
    }

    #[test]
    fn test_recover_with_wrong_hash() {
        let key = dev_key();
        let signature = key.sign_prehash(&keccak_hash(b"original")).unwrap();

        let recovered = recover_address(&keccak_hash(b"tampered"), &signature);
        assert!(recovered.map(|a| a != key.address()).unwrap_or(true));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", dev_key());
        assert!(!debug.contains(DEV_KEY));
    }
}
