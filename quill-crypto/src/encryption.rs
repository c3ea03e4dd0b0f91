// src/encryption.rs

//! Passphrase-based encryption for key material at rest.
//!
//! A passphrase is stretched with Argon2id into a 256-bit key, which then
//! seals the payload with AES-256-GCM. Associated data binds a ciphertext
//! to its context (the keystore address), so a ciphertext moved to another
//! keystore file fails to open.

use crate::errors::{CryptoError, Result};
use crate::{AES_KEY_SIZE, AES_NONCE_SIZE, SALT_SIZE};
use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Argon2id cost parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub m_cost: u32,
    /// Time cost (iterations)
    pub t_cost: u32,
    /// Parallelism
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: 19_456,
            t_cost: 2,
            p_cost: 1,
        }
    }
}

impl KdfParams {
    /// Minimal parameters for tests. Never use for real keystores.
    pub fn insecure_fast() -> Self {
        Self {
            m_cost: 1024,
            t_cost: 1,
            p_cost: 1,
        }
    }
}

/// Output of [`seal_with_passphrase`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedData {
    /// Argon2id salt
    pub salt: Vec<u8>,
    /// nonce || ciphertext || tag
    pub ciphertext: Vec<u8>,
}

/// Stretches a passphrase into an AES-256 key with Argon2id
pub fn derive_passphrase_key(
    passphrase: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; AES_KEY_SIZE]>> {
    let argon_params = Params::new(params.m_cost, params.t_cost, params.p_cost, Some(AES_KEY_SIZE))
        .map_err(|e| CryptoError::KdfError(format!("Invalid parameters: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key = Zeroizing::new([0u8; AES_KEY_SIZE]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
        .map_err(|e| CryptoError::KdfError(format!("Derivation failed: {}", e)))?;

    Ok(key)
}

/// Encrypts `plaintext` under a passphrase with a fresh random salt and nonce
pub fn seal_with_passphrase(
    plaintext: &[u8],
    passphrase: &str,
    associated_data: &[u8],
    params: &KdfParams,
) -> Result<SealedData> {
    let mut salt = vec![0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);

    let key = derive_passphrase_key(passphrase, &salt, params)?;
    let ciphertext = encrypt_with_aad(plaintext, &key[..], associated_data)?;

    Ok(SealedData { salt, ciphertext })
}

/// Decrypts data produced by [`seal_with_passphrase`]
///
/// A wrong passphrase surfaces as [`CryptoError::DecryptionError`].
pub fn open_with_passphrase(
    sealed: &SealedData,
    passphrase: &str,
    associated_data: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<Vec<u8>>> {
    let key = derive_passphrase_key(passphrase, &sealed.salt, params)?;
    decrypt_with_aad(&sealed.ciphertext, &key[..], associated_data).map(Zeroizing::new)
}

/// Encrypts with associated data for additional authentication
///
/// # Arguments
/// * `plaintext` - Data to encrypt
/// * `key` - 32-byte encryption key
/// * `associated_data` - Additional data to authenticate (not encrypted)
///
/// # Returns
/// Encrypted data (nonce || ciphertext || tag)
pub fn encrypt_with_aad(plaintext: &[u8], key: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
    if key.len() != AES_KEY_SIZE {
        return Err(CryptoError::EncryptionError(format!(
            "Invalid key size: expected {}, got {}",
            AES_KEY_SIZE,
            key.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::EncryptionError(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; AES_NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let payload = Payload {
        msg: plaintext,
        aad: associated_data,
    };

    let ciphertext = cipher
        .encrypt(nonce, payload)
        .map_err(|e| CryptoError::EncryptionError(format!("Encryption failed: {}", e)))?;

    let mut result = Vec::with_capacity(AES_NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypts with associated data verification
///
/// # Arguments
/// * `ciphertext` - Encrypted data (nonce || ciphertext || tag)
/// * `key` - 32-byte decryption key
/// * `associated_data` - Associated data that must match encryption
pub fn decrypt_with_aad(ciphertext: &[u8], key: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
    if key.len() != AES_KEY_SIZE {
        return Err(CryptoError::DecryptionError(format!(
            "Invalid key size: expected {}, got {}",
            AES_KEY_SIZE,
            key.len()
        )));
    }

    if ciphertext.len() < AES_NONCE_SIZE {
        return Err(CryptoError::DecryptionError("Ciphertext too short".to_string()));
    }

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::DecryptionError(format!("Failed to create cipher: {}", e)))?;

    let nonce = Nonce::from_slice(&ciphertext[..AES_NONCE_SIZE]);

    let payload = Payload {
        msg: &ciphertext[AES_NONCE_SIZE..],
        aad: associated_data,
    };

    cipher
        .decrypt(nonce, payload)
        .map_err(|e| CryptoError::DecryptionError(format!("Decryption failed: {}", e)))
}
