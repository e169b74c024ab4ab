//! # tally-types
//!
//! Shared domain types used across the Tally workspace.
//!
//! ## Modules
//!
//! - [`feed`] — 32-byte feed identifiers and their legacy/content-addressed classes
//! - [`principal`] — account addresses
//! - [`report`] — a single reported value
//! - [`events`] — events emitted by the oracle ledger

pub mod events;
pub mod feed;
pub mod principal;
pub mod report;

pub use events::OracleEvent;
pub use feed::{FeedClass, FeedId};
pub use principal::Address;
pub use report::Report;

/// Token amounts in base units.
pub type Amount = u128;
/// Unix timestamp in seconds.
pub type Timestamp = u64;
/// Block height.
pub type BlockHeight = u64;
/// Opaque byte payload.
pub type Bytes = Vec<u8>;

/// Base units per whole token (18 decimals).
pub const BASE_UNITS_PER_TOKEN: Amount = 1_000_000_000_000_000_000;

/// Length of the time-based reward interval in seconds.
pub const REWARD_INTERVAL_SECS: u64 = 300;

/// Largest numeric value of a legacy feed identifier. Anything above is
/// content-addressed.
pub const LEGACY_FEED_ID_MAX: u64 = 100;

/// Sentinel returned by the oracle's `verify()` check.
pub const VERIFY_SENTINEL: u64 = 9999;

/// Error types for parsing shared types.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// Input was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded input had the wrong length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        actual: usize,
    },
}

/// Convenience result type for type parsing.
pub type Result<T> = std::result::Result<T, TypesError>;

/// Decode a `0x`-prefixed or bare hex string into 32 bytes.
pub(crate) fn decode_32(s: &str) -> Result<[u8; 32]> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    let actual = bytes.len();
    <[u8; 32]>::try_from(bytes).map_err(|_| TypesError::InvalidLength {
        expected: 32,
        actual,
    })
}
