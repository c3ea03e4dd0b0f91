// src/transaction.rs

//! Value-transfer transactions, EIP-155 signing and RLP wire encoding.
//!
//! A [`ResolvedTransaction`] has every field fixed, including the nonce.
//! Signing consumes it, so a resolved transaction is signed at most once.

use crate::errors::{CoreError, Result};
use crate::types::{Address, TxHash, Wei};
use quill_crypto::hash::keccak_hash;
use quill_crypto::keys::{recover_address, RecoverableSignature};
use quill_crypto::{SecretKey, HASH_SIZE};
use rlp::RlpStream;

/// Gas consumed by a plain value transfer
pub const INTRINSIC_GAS: u64 = 21_000;

/// Largest chain id whose EIP-155 `v` still fits in a `u64`
pub const MAX_CHAIN_ID: u64 = (u64::MAX - 36) / 2;

/// A transfer with every field resolved, ready to sign
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedTransaction {
    /// Sender; the signing key must control this address
    pub from: Address,

    /// Recipient
    pub to: Address,

    /// Amount transferred
    pub value_wei: Wei,

    /// Gas limit
    pub gas_limit: u64,

    /// Gas price in wei
    pub gas_price_wei: Wei,

    /// EIP-155 chain id
    pub chain_id: u64,

    /// Sender's account nonce
    pub nonce: u64,
}

impl ResolvedTransaction {
    /// Keccak-256 of the EIP-155 signing payload
    ///
    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`
    pub fn signing_hash(&self) -> [u8; HASH_SIZE] {
        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream);
        stream.append(&self.chain_id);
        stream.append(&0u8);
        stream.append(&0u8);

        keccak_hash(&stream.out())
    }

    /// Signs with `key`, consuming the transaction
    ///
    /// Fails with [`CoreError::Signing`] if the key does not control
    /// `from` or the transaction could never be valid on chain.
    pub fn sign(self, key: &SecretKey) -> Result<SignedTransaction> {
        let signer = Address::from(key.address());
        if signer != self.from {
            return Err(CoreError::Signing(format!(
                "key controls {} but the sender is {}",
                signer, self.from
            )));
        }
        if self.chain_id == 0 || self.chain_id > MAX_CHAIN_ID {
            return Err(CoreError::Signing(format!("chain id {} out of range", self.chain_id)));
        }
        if self.gas_limit < INTRINSIC_GAS {
            return Err(CoreError::Signing(format!(
                "gas limit {} below intrinsic cost {}",
                self.gas_limit, INTRINSIC_GAS
            )));
        }

        let hash = self.signing_hash();
        let signature = key
            .sign_prehash(&hash)
            .map_err(|e| CoreError::Signing(e.to_string()))?;

        let v = u64::from(signature.recovery_id) + 35 + 2 * self.chain_id;

        Ok(SignedTransaction {
            transaction: self,
            v,
            r: signature.r,
            s: signature.s,
        })
    }

    fn append_fields(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price_wei);
        stream.append(&self.gas_limit);
        stream.append(&self.to.as_bytes().to_vec());
        stream.append(&self.value_wei);
        stream.append_empty_data();
    }
}

/// A transaction with its EIP-155 signature
#[derive(Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The signed fields
    pub transaction: ResolvedTransaction,

    /// `recovery_id + 35 + 2 * chain_id`
    pub v: u64,

    /// Signature `r`, big-endian
    pub r: [u8; 32],

    /// Signature `s`, big-endian
    pub s: [u8; 32],
}

impl SignedTransaction {
    /// Raw wire bytes: `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.recovery_id()?;
        if self.r.iter().all(|b| *b == 0) || self.s.iter().all(|b| *b == 0) {
            return Err(CoreError::Encode("signature has a zero component".to_string()));
        }

        let mut stream = RlpStream::new_list(9);
        self.transaction.append_fields(&mut stream);
        stream.append(&self.v);
        stream.append(&trim_leading_zeros(&self.r).to_vec());
        stream.append(&trim_leading_zeros(&self.s).to_vec());

        Ok(stream.out().to_vec())
    }

    /// Keccak-256 of the wire bytes
    pub fn hash(&self) -> Result<TxHash> {
        Ok(TxHash(keccak_hash(&self.encode()?)))
    }

    /// Recovers the address that produced the signature
    pub fn recover_sender(&self) -> Result<Address> {
        let signature = RecoverableSignature {
            r: self.r,
            s: self.s,
            recovery_id: self.recovery_id()?,
        };

        recover_address(&self.transaction.signing_hash(), &signature)
            .map(Address::from)
            .map_err(|e| CoreError::Signing(e.to_string()))
    }

    fn recovery_id(&self) -> Result<u8> {
        let base = 35 + 2 * self.transaction.chain_id;
        match self.v.checked_sub(base) {
            Some(id @ 0..=1) => Ok(id as u8),
            _ => Err(CoreError::Encode(format!(
                "v {} does not match chain id {}",
                self.v, self.transaction.chain_id
            ))),
        }
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
