// src/mnemonic.rs

//! BIP-39 mnemonic generation and seed derivation.
//!
//! Word lists, checksums and PBKDF2 seed stretching come from the `bip39`
//! crate; this module only fixes the supported entropy sizes and keeps
//! phrases and seeds out of memory once dropped.

use crate::errors::{CryptoError, Result};
use crate::SEED_SIZE;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Entropy sizes accepted by [`generate_mnemonic`], in bits
pub const SUPPORTED_ENTROPY_BITS: [usize; 5] = [128, 160, 192, 224, 256];

/// A BIP-39 mnemonic phrase (English word list)
///
/// The phrase is zeroized on drop. `Debug` never prints the words.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic {
    phrase: String,
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mnemonic([REDACTED; {} words])", self.word_count())
    }
}

impl Mnemonic {
    /// Parses and validates a phrase (word list membership and checksum)
    pub fn parse(phrase: &str) -> Result<Self> {
        let parsed = bip39::Mnemonic::parse_in_normalized(bip39::Language::English, phrase)
            .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;

        Ok(Self {
            phrase: parsed.to_string(),
        })
    }

    /// Returns the phrase as a string slice
    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    /// Returns the individual words
    pub fn words(&self) -> Vec<&str> {
        self.phrase.split_whitespace().collect()
    }

    /// Returns the number of words
    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }

    /// Derives the 64-byte BIP-39 seed for `passphrase`
    pub fn to_seed(&self, passphrase: &str) -> Result<Zeroizing<[u8; SEED_SIZE]>> {
        let parsed = bip39::Mnemonic::parse_in_normalized(bip39::Language::English, &self.phrase)
            .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;

        Ok(Zeroizing::new(parsed.to_seed(passphrase)))
    }
}

/// Generates a new mnemonic from `bits_of_entropy` bits of OS randomness
///
/// # Example
/// ```
/// use quill_crypto::mnemonic::generate_mnemonic;
///
/// let mnemonic = generate_mnemonic(128).unwrap();
/// assert_eq!(mnemonic.word_count(), 12);
/// assert!(generate_mnemonic(100).is_err());
/// ```
pub fn generate_mnemonic(bits_of_entropy: usize) -> Result<Mnemonic> {
    if !SUPPORTED_ENTROPY_BITS.contains(&bits_of_entropy) {
        return Err(CryptoError::InvalidEntropy(bits_of_entropy));
    }

    let mut entropy = Zeroizing::new(vec![0u8; bits_of_entropy / 8]);
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;

    Ok(Mnemonic {
        phrase: mnemonic.to_string(),
    })
}

/// Canonical word count for an entropy size (entropy + checksum, 11 bits per word)
pub fn word_count_for_entropy(bits_of_entropy: usize) -> Option<usize> {
    if SUPPORTED_ENTROPY_BITS.contains(&bits_of_entropy) {
        Some((bits_of_entropy + bits_of_entropy / 32) / 11)
    } else {
        None
    }
}
