//! Configuration types for the ledger

use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::env;

/// Runtime configuration for a ledger instance
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Required count of leading `'0'` hex digits in every mined hash
    pub difficulty: u32,

    /// Upper bound on nonces tried per block (None = unbounded search)
    pub max_nonce_iterations: Option<u64>,

    /// Payload literal carried by the genesis block
    pub genesis_payload: String,

    /// Buffer size of the outbound event channel
    pub event_channel_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: crate::DEFAULT_DIFFICULTY,
            max_nonce_iterations: Some(50_000_000),
            genesis_payload: crate::GENESIS_PAYLOAD.to_string(),
            event_channel_capacity: 256,
        }
    }
}

impl LedgerConfig {
    /// Configuration with the given difficulty and defaults elsewhere.
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GC_DIFFICULTY`: leading zero digits (default: 2)
    /// - `GC_MAX_NONCE_ITERATIONS`: search cap, `0` disables it (default: 50000000)
    /// - `GC_GENESIS_PAYLOAD`: genesis payload (default: "Genesis Block")
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_nonce_iterations = match env::var("GC_MAX_NONCE_ITERATIONS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            Some(0) => None,
            Some(cap) => Some(cap),
            None => defaults.max_nonce_iterations,
        };

        Self {
            difficulty: env::var("GC_DIFFICULTY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.difficulty),
            max_nonce_iterations,
            genesis_payload: env::var("GC_GENESIS_PAYLOAD").unwrap_or(defaults.genesis_payload),
            event_channel_capacity: defaults.event_channel_capacity,
        }
    }

    /// Reject settings the ledger cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.difficulty > crate::MAX_DIFFICULTY {
            return Err(LedgerError::InvalidConfig(format!(
                "difficulty {} exceeds hash length {}",
                self.difficulty,
                crate::MAX_DIFFICULTY
            )));
        }
        if self.max_nonce_iterations == Some(0) {
            return Err(LedgerError::InvalidConfig(
                "max_nonce_iterations must be positive".to_string(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(LedgerError::InvalidConfig(
                "event_channel_capacity must be positive".to_string(),
            ));
        }
        if self.difficulty > 5 {
            tracing::warn!(
                difficulty = self.difficulty,
                "High difficulty: expected search cost grows 16x per digit"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.difficulty, crate::DEFAULT_DIFFICULTY);
        assert_eq!(config.genesis_payload, "Genesis Block");
        assert_eq!(config.max_nonce_iterations, Some(50_000_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_difficulty_beyond_hash_length() {
        let config = LedgerConfig::with_difficulty(65);
        assert!(matches!(
            config.validate(),
            Err(LedgerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_capacities() {
        let config = LedgerConfig {
            max_nonce_iterations: Some(0),
            ..LedgerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LedgerConfig {
            event_channel_capacity: 0,
            ..LedgerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LedgerConfig = serde_json::from_str(r#"{ "difficulty": 3 }"#).unwrap();
        assert_eq!(config.difficulty, 3);
        assert_eq!(config.genesis_payload, "Genesis Block");
    }
}
