//! # GovChain Records
//!
//! Typed entries the application layer submits to a GovChain ledger. The
//! ledger itself treats entries as opaque JSON; this crate fixes their shape
//! so that every entry carries a top-level `"hash"` field the ledger's
//! marker search can find.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `entries` | `LedgerEntry` and its record types |
//! | `fingerprint` | SHA-256 fingerprints and random record hashes |
//! | `signing` | HMAC-SHA256 message signing (illustrative only) |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entries;
pub mod errors;
pub mod fingerprint;
pub mod signing;

pub use entries::{
    DocumentRecord, IdentityRecord, IdentityRevocation, LedgerEntry, TransactionRecord,
    TransactionStatus,
};
pub use errors::RecordError;
pub use fingerprint::{
    document_fingerprint, identity_fingerprint, random_document_hash, random_transaction_hash,
    transaction_fingerprint,
};
pub use signing::{sign_message, verify_signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
