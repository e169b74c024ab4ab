//! # tally-oracle
//!
//! Oracle ledger and incentive engine.
//!
//! Anyone can post a tip against a feed; staked reporters submit timestamped
//! values for it and are paid the feed's pending tips plus a time-based
//! reward funded by the oracle's own token balance. Governance can excise
//! disputed reports and retune the cooldown and reward rate.
//!
//! Every mutating call is one atomic transaction against `&mut Oracle`: all
//! preconditions are checked before any state changes, internal accounting is
//! finalized before tokens move, and a failed token movement undoes the
//! accounting before the error is returned.
//!
//! ## Modules
//!
//! - [`oracle`] — The [`Oracle`](oracle::Oracle) ledger and its context
//! - [`feed_id`] — Content-addressed feed identifier validation
//! - [`tips`] — Tip ledger with burn-on-contribution
//! - [`submission`] — Report time series, cooldowns and `submit_value`
//! - [`rewards`] — Tip and time-based reward computation
//! - [`maintenance`] — Governance-only removal and parameter changes
//! - [`collaborators`] — Token, staking and governance interfaces
//! - [`params`] — Governance-mutable parameters
//! - [`config`] — TOML deployment configuration
//! - [`stub`] — In-memory collaborators for tests and local runs

pub mod collaborators;
pub mod config;
pub mod feed_id;
pub mod maintenance;
pub mod oracle;
pub mod params;
pub mod rewards;
pub mod stub;
pub mod submission;
pub mod tips;

#[cfg(test)]
mod testutil;

pub use collaborators::{Governance, StakingRegistry, TokenLedger, TxContext};
pub use config::OracleConfig;
pub use oracle::Oracle;
pub use rewards::CurrentReward;

use tally_types::{Address, Amount, FeedId, Timestamp};

/// Error types for oracle operations.
///
/// Every variant aborts the whole call; no partial effects survive.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Tip contribution of zero.
    #[error("tip amount is zero")]
    ZeroAmount,

    /// Caller cannot fund the requested amount.
    #[error("insufficient balance: need {required}, have {available}")]
    InsufficientBalance {
        /// Amount the call needed.
        required: Amount,
        /// Amount the account holds.
        available: Amount,
    },

    /// Content-addressed feed id does not equal the descriptor hash.
    #[error("feed id {feed_id} does not match descriptor hash {descriptor_hash}")]
    IdentifierMismatch {
        /// The feed id supplied by the caller.
        feed_id: FeedId,
        /// Hash of the supplied descriptor.
        descriptor_hash: FeedId,
    },

    /// Reporter stake is below the registry threshold.
    #[error("reporter not staked: staked {staked}, required {required}")]
    NotStaked {
        /// Reporter's staked balance.
        staked: Amount,
        /// Current minimum stake.
        required: Amount,
    },

    /// Submitted nonce does not equal the feed's current length.
    #[error("stale nonce: expected {expected}, got {provided}")]
    StaleNonce {
        /// Current feed length.
        expected: u64,
        /// Nonce presented by the reporter.
        provided: u64,
    },

    /// The reporter's cooldown for this feed has not elapsed.
    #[error("cooldown active: last report {last_report}, now {now}, mining lock {mining_lock}s")]
    CooldownActive {
        /// Reporter's last report time for the feed.
        last_report: Timestamp,
        /// Current block timestamp.
        now: Timestamp,
        /// Configured cooldown in seconds.
        mining_lock: u64,
    },

    /// Governance-only operation called by another principal.
    #[error("unauthorized caller: {0}")]
    Unauthorized(Address),

    /// No report exists at the given timestamp.
    #[error("no report for feed {feed_id} at timestamp {timestamp}")]
    NotFound {
        /// Feed searched.
        feed_id: FeedId,
        /// Timestamp searched.
        timestamp: Timestamp,
    },

    /// The feed already holds a report at this timestamp.
    #[error("feed {feed_id} already has a report at timestamp {timestamp}")]
    DuplicateTimestamp {
        /// Feed reported to.
        feed_id: FeedId,
        /// Conflicting timestamp.
        timestamp: Timestamp,
    },

    /// Submission timestamp is older than the feed's newest report.
    #[error("non-monotonic timestamp: {new} < {last}")]
    NonMonotonicTimestamp {
        /// The rejected timestamp.
        new: Timestamp,
        /// The feed's newest report timestamp.
        last: Timestamp,
    },

    /// The token ledger refused a transfer or burn for a reason other than
    /// balance.
    #[error("token ledger error: {0}")]
    Token(String),

    /// Arithmetic overflow in tip accounting.
    #[error("arithmetic overflow in tip accounting")]
    Overflow,

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
