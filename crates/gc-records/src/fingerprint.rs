//! Record fingerprints
//!
//! A fingerprint is the SHA-256 digest (lowercase hex) of a record's
//! identifying fields concatenated as strings. Identical records always
//! produce the same fingerprint; the random helpers exist for callers that
//! want an opaque handle instead.

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Bytes of entropy in a random document hash (40 hex digits)
pub const DOCUMENT_HASH_BYTES: usize = 20;

/// Bytes of entropy in a random transaction hash (64 hex digits)
pub const TRANSACTION_HASH_BYTES: usize = 32;

fn digest_parts(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Fingerprint of a budget transaction
pub fn transaction_fingerprint(
    category: &str,
    entity: &str,
    amount: u64,
    timestamp: DateTime<Utc>,
) -> String {
    digest_parts(&[
        category.as_bytes(),
        entity.as_bytes(),
        amount.to_string().as_bytes(),
        timestamp.timestamp_millis().to_string().as_bytes(),
    ])
}

/// Fingerprint of a document: its name followed by its content
pub fn document_fingerprint(name: &str, content: &[u8]) -> String {
    digest_parts(&[name.as_bytes(), content])
}

/// Fingerprint of a digital identity
pub fn identity_fingerprint(identifier: &str, organization: &str, role: &str) -> String {
    digest_parts(&[identifier.as_bytes(), organization.as_bytes(), role.as_bytes()])
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Random 40-digit document handle
pub fn random_document_hash() -> String {
    random_hex(DOCUMENT_HASH_BYTES)
}

/// Random 64-digit transaction handle
pub fn random_transaction_hash() -> String {
    random_hex(TRANSACTION_HASH_BYTES)
}
