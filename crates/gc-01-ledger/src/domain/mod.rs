//! Domain layer - Pure ledger logic
//!
//! Everything here is synchronous and free of I/O. The async service and
//! the persistence adapters wrap these types without changing their rules.
//!
//! ## Entities
//!
//! - [`Block`]: Immutable sealed block
//! - [`BlockRecord`]: Plain-data transfer form of a block
//! - [`BlockCandidate`]: Block fields fixed before the nonce search
//!
//! ## Services
//!
//! - [`ProofOfWork`]: Linear nonce search against a difficulty
//! - [`Ledger`]: Chain, pending buffer and lookups
//! - [`IntegrityVerifier`]: Validation of chains supplied as data
//!
//! ## Invariants
//!
//! Checked by the functions in [`invariants`]:
//! 1. Stored hash matches block fields
//! 2. Previous-hash links to the preceding block
//! 3. Non-genesis hashes meet the difficulty
//! 4. Genesis carries the sentinel previous hash
//! 5. Indices are contiguous

mod block;
mod chain;
pub mod genesis;
pub mod invariants;
mod pow;
mod transfer;
mod verifier;

pub use block::{truncate_to_millis, Block};
pub use chain::{serialize_entries, BlockCandidate, ChainSummary, Ledger};
pub use genesis::*;
pub use invariants::*;
pub use pow::{MiningOutcome, ProofOfWork};
pub use transfer::{blocks_from_records, BlockRecord};
pub use verifier::{search_payload_for_marker, IntegrityVerifier, MarkerSearch, MARKER_FIELD};
