//! Deployment configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty or missing
//! file yields a working deployment.
//!
//! ```toml
//! mining_lock_secs = 43200
//! time_based_reward = 500000000000000000
//! address = "0x…"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use tally_crypto::blake3;
use tally_types::Address;

use crate::{OracleError, Result};

/// Default reporter cooldown (12 hours).
pub const DEFAULT_MINING_LOCK_SECS: u64 = 12 * 3600;

/// Default time-based reward per 300-second interval (0.5 token).
pub const DEFAULT_TIME_BASED_REWARD: u64 = 500_000_000_000_000_000;

/// Oracle deployment configuration.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Initial reporter cooldown in seconds.
    #[serde(default = "default_mining_lock")]
    pub mining_lock_secs: u64,
    /// Initial time-based reward per interval, in token base units.
    #[serde(default = "default_time_based_reward")]
    pub time_based_reward: u64,
    /// The oracle's own token account, `0x`-prefixed or bare hex.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_address")]
    pub address: Address,
}

fn default_mining_lock() -> u64 {
    DEFAULT_MINING_LOCK_SECS
}

fn default_time_based_reward() -> u64 {
    DEFAULT_TIME_BASED_REWARD
}

fn default_address() -> Address {
    Address::new(blake3::derive_key(
        blake3::contexts::ORACLE_ACCOUNT,
        b"tally-oracle",
    ))
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            mining_lock_secs: default_mining_lock(),
            time_based_reward: default_time_based_reward(),
            address: default_address(),
        }
    }
}

impl OracleConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: OracleConfig =
            toml::from_str(content).map_err(|e| OracleError::Config(e.to_string()))?;
        if config.address.is_zero() {
            return Err(OracleError::Config(
                "oracle address must be non-zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load configuration from `path`.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "oracle config not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| OracleError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| OracleError::Config(e.to_string()))
    }
}
