//! Events emitted by the oracle ledger.
//!
//! Every successful state-changing call appends exactly one event to the
//! oracle's journal. Token amounts are encoded as decimal strings, since
//! they routinely exceed the integer range of JSON consumers.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as, DisplayFromStr};

use crate::{Address, Amount, Bytes, FeedId, Timestamp};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum OracleEvent {
    /// A tip was posted against a feed.
    TipAdded {
        feed_id: FeedId,
        contributor: Address,
        /// Gross amount pulled from the contributor.
        #[serde_as(as = "DisplayFromStr")]
        amount: Amount,
        /// Portion removed from total supply.
        #[serde_as(as = "DisplayFromStr")]
        burned: Amount,
        /// Portion credited to the feed's pending pool.
        #[serde_as(as = "DisplayFromStr")]
        credited: Amount,
    },

    /// A report was accepted and its reward settled.
    NewReport {
        feed_id: FeedId,
        timestamp: Timestamp,
        #[serde_as(as = "Hex")]
        value: Bytes,
        /// Index the report occupies (the nonce the reporter presented).
        nonce: u64,
        reporter: Address,
        #[serde_as(as = "DisplayFromStr")]
        tip_paid: Amount,
        #[serde_as(as = "DisplayFromStr")]
        time_based_paid: Amount,
    },

    /// Governance removed a report.
    ValueRemoved {
        feed_id: FeedId,
        timestamp: Timestamp,
        reporter: Address,
    },

    MiningLockChanged { old: u64, new: u64 },

    TimeBasedRewardChanged {
        #[serde_as(as = "DisplayFromStr")]
        old: Amount,
        #[serde_as(as = "DisplayFromStr")]
        new: Amount,
    },
}
