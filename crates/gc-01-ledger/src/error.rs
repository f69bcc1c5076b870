//! Error types for the ledger subsystem

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while sealing or restoring blocks
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Nonce search hit the configured iteration cap
    #[error("Mining exhausted: no nonce met difficulty {difficulty} after {attempts} attempts")]
    MiningExhausted {
        /// Difficulty that was being searched
        difficulty: u32,
        /// Nonces tried before giving up
        attempts: u64,
    },

    /// Nonce search was cancelled by the caller
    #[error("Mining cancelled")]
    MiningCancelled,

    /// A mined candidate no longer extends the chain tip
    #[error("Stale candidate: expected parent {expected_parent}, chain tip is {actual_parent}")]
    StaleCandidate {
        /// Parent hash the candidate was built on
        expected_parent: String,
        /// Hash of the current chain tip
        actual_parent: String,
    },

    /// Entry or payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Check if error is recoverable (caller may try again)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MiningCancelled | Self::StaleCandidate { .. })
    }

    /// Check if error points at misconfiguration (difficulty too high, bad settings)
    ///
    /// These are never retried automatically.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MiningExhausted { .. } | Self::InvalidConfig(_))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
