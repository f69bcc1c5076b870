//! Hashing utilities for the ledger
//!
//! Block hashes are SHA-256 digests rendered as 64 lowercase hex digits.
//! The preimage is the plain string concatenation
//! `index ‖ previous_hash ‖ timestamp_millis ‖ payload ‖ nonce`, with
//! integers written in decimal.

use sha2::{Digest, Sha256};

/// Cosmetic marker prepended to hashes in human-facing output
pub const DISPLAY_PREFIX: &str = "0x";

/// Symbol counted by the difficulty predicate
pub const DIFFICULTY_SYMBOL: u8 = b'0';

/// Compute the SHA-256 digest of `data` as lowercase hex
#[inline]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hasher state already fed with every block field except the nonce
///
/// Mining clones this state once per attempt instead of rebuilding the
/// whole preimage.
pub fn block_prefix_hasher(
    index: u64,
    previous_hash: &str,
    timestamp_millis: i64,
    payload: &str,
) -> Sha256 {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(previous_hash.as_bytes());
    hasher.update(timestamp_millis.to_string().as_bytes());
    hasher.update(payload.as_bytes());
    hasher
}

/// Finish a prefix hasher with the given nonce
#[inline]
pub fn finish_with_nonce(prefix: &Sha256, nonce: u64) -> String {
    let mut hasher = prefix.clone();
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the hash of a block from its fields
pub fn block_hash(
    index: u64,
    previous_hash: &str,
    timestamp_millis: i64,
    payload: &str,
    nonce: u64,
) -> String {
    let prefix = block_prefix_hasher(index, previous_hash, timestamp_millis, payload);
    finish_with_nonce(&prefix, nonce)
}

/// Remove the cosmetic display prefix, if present
#[inline]
pub fn strip_display_prefix(hash: &str) -> &str {
    hash.strip_prefix(DISPLAY_PREFIX).unwrap_or(hash)
}

/// Render a hash for display with the `0x` marker
pub fn display_hash(hash: &str) -> String {
    format!("{}{}", DISPLAY_PREFIX, strip_display_prefix(hash))
}

/// Check if hash meets difficulty
///
/// Returns true if the hash (ignoring any display prefix) starts with at
/// least `difficulty` zero digits. Difficulty 0 accepts every hash.
#[inline]
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let digits = strip_display_prefix(hash).as_bytes();
    let required = difficulty as usize;
    digits.len() >= required && digits[..required].iter().all(|b| *b == DIFFICULTY_SYMBOL)
}
