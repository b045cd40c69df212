//! Hashing helpers shared across the schema.

use hawser_core::H256;
use sha3::{Digest, Keccak256};

/// Computes the keccak-256 hash of `bytes`.
pub fn keccak256(bytes: &[u8]) -> H256 {
    H256::from_slice(Keccak256::digest(bytes).as_slice())
}
