// src/hd.rs

//! BIP-32 hierarchical deterministic derivation of secp256k1 keys.

use crate::errors::{CryptoError, Result};
use crate::keys::SecretKey;
use bip32::{DerivationPath, XPrv};
use std::str::FromStr;

/// Parses a derivation path such as `m/44'/60'/0'/0`
pub fn parse_path(path: &str) -> Result<DerivationPath> {
    DerivationPath::from_str(path)
        .map_err(|e| CryptoError::DerivationError(format!("Invalid derivation path '{}': {}", path, e)))
}

/// Path of child `index` under `prefix` (`m/44'/60'/0'/0` + `3` → `m/44'/60'/0'/0/3`)
pub fn child_path(prefix: &str, index: u32) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), index)
}

/// Derives the private key at `path` from a BIP-39 seed
pub fn derive_secret_key(seed: &[u8], path: &str) -> Result<SecretKey> {
    let path = parse_path(path)?;
    let xprv = XPrv::derive_from_path(seed, &path)
        .map_err(|e| CryptoError::DerivationError(format!("Key derivation failed: {}", e)))?;

    Ok(SecretKey::from_signing_key(xprv.private_key().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::Mnemonic;

    const PHRASE: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_parse_path() {
        assert!(parse_path("m/44'/60'/0'/0").is_ok());
        assert!(parse_path("m/44'/60'/0'/0/0").is_ok());
        assert!(parse_path("44/60").is_err());
        assert!(parse_path("m/abc").is_err());
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("m/44'/60'/0'/0", 0), "m/44'/60'/0'/0/0");
        assert_eq!(child_path("m/44'/60'/0'/0/", 7), "m/44'/60'/0'/0/7");
    }

    #[test]
    fn test_known_derivation() {
        // The standard development mnemonic derives Hardhat account #0
        let seed = Mnemonic::parse(PHRASE).unwrap().to_seed("").unwrap();
        let key = derive_secret_key(&seed[..], "m/44'/60'/0'/0/0").unwrap();

        assert_eq!(
            hex::encode(key.address()),
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_derivation_deterministic() {
        let seed = Mnemonic::parse(PHRASE).unwrap().to_seed("").unwrap();
        let k1 = derive_secret_key(&seed[..], "m/44'/60'/0'/0/1").unwrap();
        let k2 = derive_secret_key(&seed[..], "m/44'/60'/0'/0/1").unwrap();
        let k3 = derive_secret_key(&seed[..], "m/44'/60'/0'/0/2").unwrap();

        assert_eq!(k1.address(), k2.address());
        assert_ne!(k1.address(), k3.address());
    }

    #[test]
    fn test_invalid_path_rejected() {
        let seed = [1u8; 64];
        let result = derive_secret_key(&seed, "not/a/path");
        assert!(matches!(result, Err(CryptoError::DerivationError(_))));
    }
}
