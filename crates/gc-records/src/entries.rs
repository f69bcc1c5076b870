//! Ledger entry shapes
//!
//! Every variant serialises flat with a `kind` tag and a top-level `hash`:
//!
//! ```json
//! { "kind": "document_verified", "hash": "9f2c…", "name": "permit.pdf", "verifiedAt": "…" }
//! ```

use crate::errors::RecordError;
use crate::fingerprint::{document_fingerprint, identity_fingerprint, transaction_fingerprint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settlement state of a budget transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Recorded, awaiting confirmation
    Pending,
    /// Confirmed by the issuing department
    Confirmed,
}

/// Budget movement between a department and the treasury
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Fingerprint of the identifying fields
    pub hash: String,
    /// Movement category, e.g. "Allocation" or "Expense"
    pub category: String,
    /// Department or contractor
    pub entity: String,
    /// Amount in whole currency units
    pub amount: u64,
    /// Settlement state
    pub status: TransactionStatus,
    /// When the movement happened
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Build a record, fingerprinting its identifying fields
    pub fn new(
        category: impl Into<String>,
        entity: impl Into<String>,
        amount: u64,
        status: TransactionStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let category = category.into();
        let entity = entity.into();
        let hash = transaction_fingerprint(&category, &entity, amount, timestamp);
        Self {
            hash,
            category,
            entity,
            amount,
            status,
            timestamp,
        }
    }
}

/// Proof that a document existed and was verified
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Document fingerprint; the value searched for on verification
    pub hash: String,
    /// Document file name
    pub name: String,
    /// When the document was verified
    pub verified_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Build a record from a document's name and content
    pub fn from_content(name: impl Into<String>, content: &[u8], verified_at: DateTime<Utc>) -> Self {
        let name = name.into();
        Self {
            hash: document_fingerprint(&name, content),
            name,
            verified_at,
        }
    }

    /// Build a record around an existing hash
    pub fn with_hash(hash: impl Into<String>, name: impl Into<String>, verified_at: DateTime<Utc>) -> Self {
        Self {
            hash: hash.into(),
            name: name.into(),
            verified_at,
        }
    }
}

/// Issuance of a digital identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    /// Fingerprint of the identity
    pub hash: String,
    /// Public identifier, unique per holder
    pub identifier: String,
    /// Holder name
    pub name: String,
    /// Issuing organization
    pub organization: String,
    /// Role granted
    pub role: String,
    /// When the identity was issued
    pub issued_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Build a record, fingerprinting identifier, organization and role
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        organization: impl Into<String>,
        role: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let identifier = identifier.into();
        let organization = organization.into();
        let role = role.into();
        Self {
            hash: identity_fingerprint(&identifier, &organization, &role),
            identifier,
            name: name.into(),
            organization,
            role,
            issued_at,
        }
    }
}

/// Revocation of a previously issued identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRevocation {
    /// Hash of the revoked identity record
    pub hash: String,
    /// Identifier being revoked
    pub identifier: String,
    /// When the identity was revoked
    pub revoked_at: DateTime<Utc>,
    /// Optional free-text reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl IdentityRevocation {
    /// Revoke `identity`
    pub fn of(identity: &IdentityRecord, revoked_at: DateTime<Utc>, reason: Option<String>) -> Self {
        Self {
            hash: identity.hash.clone(),
            identifier: identity.identifier.clone(),
            revoked_at,
            reason,
        }
    }
}

/// Any record the application submits to the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEntry {
    /// Budget transaction
    Transaction(TransactionRecord),
    /// Document verification
    DocumentVerified(DocumentRecord),
    /// Identity issuance
    IdentityIssued(IdentityRecord),
    /// Identity revocation
    IdentityRevoked(IdentityRevocation),
}

impl LedgerEntry {
    /// The value the ledger's marker search matches on
    pub fn marker(&self) -> &str {
        match self {
            Self::Transaction(record) => &record.hash,
            Self::DocumentVerified(record) => &record.hash,
            Self::IdentityIssued(record) => &record.hash,
            Self::IdentityRevoked(record) => &record.hash,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "transaction",
            Self::DocumentVerified(_) => "document_verified",
            Self::IdentityIssued(_) => "identity_issued",
            Self::IdentityRevoked(_) => "identity_revoked",
        }
    }

    /// Render as the JSON value submitted to the ledger
    pub fn to_value(&self) -> Result<Value, RecordError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<TransactionRecord> for LedgerEntry {
    fn from(record: TransactionRecord) -> Self {
        Self::Transaction(record)
    }
}

impl From<DocumentRecord> for LedgerEntry {
    fn from(record: DocumentRecord) -> Self {
        Self::DocumentVerified(record)
    }
}

impl From<IdentityRecord> for LedgerEntry {
    fn from(record: IdentityRecord) -> Self {
        Self::IdentityIssued(record)
    }
}

impl From<IdentityRevocation> for LedgerEntry {
    fn from(record: IdentityRevocation) -> Self {
        Self::IdentityRevoked(record)
    }
}
