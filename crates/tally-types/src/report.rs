//! A single reported value.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::{Address, BlockHeight, Bytes, Timestamp};

/// One accepted report within a feed's time series.
///
/// Identity is `(feed, timestamp)`; the feed is implied by the series the
/// report lives in.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Block timestamp at submission.
    pub timestamp: Timestamp,
    /// Opaque reported payload.
    #[serde_as(as = "Hex")]
    pub value: Bytes,
    pub reporter: Address,
    /// Block height at submission.
    pub block_height: BlockHeight,
}
