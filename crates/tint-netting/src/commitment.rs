//! Hash commitments to intent amounts.
//!
//! ```text
//! digest = keccak256( amount as 32-byte big-endian || blinding )
//! ```
//!
//! This construction is **hiding** (the digest reveals nothing about the
//! amount without the blinding) and binding under keccak collision
//! resistance. It is **not** homomorphic: digests cannot be added, so a
//! batch can only be netted after each opening is revealed. An additive
//! scheme would need an elliptic-curve Pedersen commitment
//! `C = amount·G + blinding·H`.

use alloy_primitives::{B256, U256, keccak256};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};

/// A commitment together with its opening. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// The public value; safe to share with counterparties.
    pub digest: B256,
    /// Committed amount (smallest units).
    pub amount: U256,
    /// Secret blinding value.
    pub blinding: B256,
}

impl Commitment {
    /// `0x`-prefixed hex of the digest.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        format!("0x{}", hex::encode(self.digest))
    }

    /// `0x`-prefixed hex of the blinding value.
    #[must_use]
    pub fn blinding_hex(&self) -> String {
        format!("0x{}", hex::encode(self.blinding))
    }

    /// Check that this commitment's opening matches its digest.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        verify(&self.digest, self.amount, &self.blinding)
    }
}

fn digest_of(amount: U256, blinding: &B256) -> B256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(&amount.to_be_bytes::<32>());
    preimage[32..].copy_from_slice(blinding.as_slice());
    keccak256(preimage)
}

/// Fresh 32 random bytes from the operating system.
#[must_use]
pub fn random_blinding() -> B256 {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    B256::from(bytes)
}

/// Commit to `amount`. A random blinding is drawn when none is given.
#[must_use]
pub fn commit(amount: U256, blinding: Option<B256>) -> Commitment {
    let blinding = blinding.unwrap_or_else(random_blinding);
    Commitment {
        digest: digest_of(amount, &blinding),
        amount,
        blinding,
    }
}

/// Recompute the digest from an opening and compare. Never fails: a
/// malformed opening simply does not verify.
#[must_use]
pub fn verify(digest: &B256, amount: U256, blinding: &B256) -> bool {
    digest_of(amount, blinding) == *digest
}
