//! Governance-mutable global parameters.

use tally_types::{Amount, Timestamp};

use crate::OracleConfig;

/// Parameters shared by the submission ledger and reward engine.
///
/// Owned by the [`Oracle`](crate::Oracle); only the
/// [`maintenance`](crate::maintenance) operations change `mining_lock` and
/// `time_based_reward`, and only accepted reports move
/// `time_of_last_new_value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleParams {
    /// Minimum seconds between two reports by one reporter to one feed.
    pub mining_lock: u64,
    /// Reward units paid per elapsed reward interval.
    pub time_based_reward: Amount,
    /// Timestamp of the newest accepted report across all feeds. Baseline of
    /// the time-based reward clock.
    pub time_of_last_new_value: Timestamp,
}

impl OracleParams {
    /// Initial parameters at deployment time.
    pub fn from_config(config: &OracleConfig, deployed_at: Timestamp) -> Self {
        Self {
            mining_lock: config.mining_lock_secs,
            time_based_reward: Amount::from(config.time_based_reward),
            time_of_last_new_value: deployed_at,
        }
    }
}
