//! Utility modules for the ledger

pub mod hashing;

pub use hashing::{block_hash, display_hash, meets_difficulty, sha256_hex, strip_display_prefix};
