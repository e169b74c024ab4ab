//! Report time series and value submission.
//!
//! Each feed holds an ordered sequence of reports. The sequence length is the
//! nonce a reporter must present to append the next report: a submission built
//! against a stale view of the feed is rejected instead of overwriting a slot
//! another reporter already took.
//!
//! ## Submission checks
//!
//! In order, each a rejection point:
//!
//! 1. Staked balance `>=` minimum stake ([`OracleError::NotStaked`])
//! 2. `nonce == feed length` ([`OracleError::StaleNonce`])
//! 3. `now - last report by (reporter, feed) >= mining_lock`
//!    ([`OracleError::CooldownActive`])
//! 4. Content-addressed ids match the descriptor hash
//!    ([`OracleError::IdentifierMismatch`])
//! 5. `now` is newer than the feed's newest report
//!    ([`OracleError::DuplicateTimestamp`], [`OracleError::NonMonotonicTimestamp`])

use std::collections::HashMap;

use tally_types::{Address, BlockHeight, FeedId, OracleEvent, Report, Timestamp};

use crate::collaborators::{Governance, StakingRegistry, TokenLedger, TxContext};
use crate::rewards::CurrentReward;
use crate::{feed_id, Oracle, OracleError, Result};

/// Ordered reports of one feed. Removal compacts the sequence.
#[derive(Clone, Debug, Default)]
pub struct FeedTimeSeries {
    reports: Vec<Report>,
}

impl FeedTimeSeries {
    /// Number of reports in the feed.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the feed has no reports.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Position of the report at exactly `timestamp`.
    pub fn index_of(&self, timestamp: Timestamp) -> Option<usize> {
        self.reports
            .binary_search_by_key(&timestamp, |r| r.timestamp)
            .ok()
    }

    /// Report at position `index`.
    pub fn get(&self, index: usize) -> Option<&Report> {
        self.reports.get(index)
    }

    /// Report submitted at exactly `timestamp`.
    pub fn at(&self, timestamp: Timestamp) -> Option<&Report> {
        self.index_of(timestamp).and_then(|i| self.reports.get(i))
    }

    /// Newest report of the feed.
    pub fn latest(&self) -> Option<&Report> {
        self.reports.last()
    }

    /// Reject a timestamp that would break the ordering.
    fn check_append(&self, feed_id: &FeedId, timestamp: Timestamp) -> Result<()> {
        match self.latest() {
            Some(last) if last.timestamp == timestamp => Err(OracleError::DuplicateTimestamp {
                feed_id: *feed_id,
                timestamp,
            }),
            Some(last) if last.timestamp > timestamp => Err(OracleError::NonMonotonicTimestamp {
                new: timestamp,
                last: last.timestamp,
            }),
            _ => Ok(()),
        }
    }

    fn push(&mut self, report: Report) {
        self.reports.push(report);
    }

    fn pop(&mut self) -> Option<Report> {
        self.reports.pop()
    }

    /// Delete the report at `timestamp`; later reports shift down by one.
    pub fn remove(&mut self, timestamp: Timestamp) -> Option<Report> {
        let index = self.index_of(timestamp)?;
        Some(self.reports.remove(index))
    }
}

/// Cooldown state restored when a submission is rolled back.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RecordUndo {
    previous_report_time: Option<Timestamp>,
}

/// All feeds' time series plus per-reporter bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct ReportStore {
    feeds: HashMap<FeedId, FeedTimeSeries>,
    last_report: HashMap<(Address, FeedId), Timestamp>,
    submitted: HashMap<Address, u64>,
}

impl ReportStore {
    /// Time series of `feed_id`, if it has ever been reported to.
    pub fn series(&self, feed_id: &FeedId) -> Option<&FeedTimeSeries> {
        self.feeds.get(feed_id)
    }

    /// Number of reports in a feed; the nonce for its next report.
    pub fn count(&self, feed_id: &FeedId) -> u64 {
        self.series(feed_id).map_or(0, |s| s.len() as u64)
    }

    /// Cooldown clock of `reporter` on `feed_id`.
    pub fn last_report_time(&self, reporter: &Address, feed_id: &FeedId) -> Option<Timestamp> {
        self.last_report.get(&(*reporter, *feed_id)).copied()
    }

    /// Lifetime number of reports accepted from `reporter`.
    pub fn submitted_by(&self, reporter: &Address) -> u64 {
        self.submitted.get(reporter).copied().unwrap_or(0)
    }

    fn check_append(&self, feed_id: &FeedId, timestamp: Timestamp) -> Result<()> {
        match self.series(feed_id) {
            Some(series) => series.check_append(feed_id, timestamp),
            None => Ok(()),
        }
    }

    /// Append a report and advance the reporter's bookkeeping.
    pub(crate) fn record(&mut self, feed_id: FeedId, report: Report) -> RecordUndo {
        let reporter = report.reporter;
        let previous_report_time = self
            .last_report
            .insert((reporter, feed_id), report.timestamp);
        *self.submitted.entry(reporter).or_default() += 1;
        self.feeds.entry(feed_id).or_default().push(report);
        RecordUndo {
            previous_report_time,
        }
    }

    /// Reverse the most recent [`record`](Self::record) on `feed_id`.
    pub(crate) fn unrecord(&mut self, feed_id: &FeedId, undo: RecordUndo) {
        let Some(report) = self.feeds.get_mut(feed_id).and_then(FeedTimeSeries::pop) else {
            return;
        };
        let key = (report.reporter, *feed_id);
        match undo.previous_report_time {
            Some(previous) => {
                self.last_report.insert(key, previous);
            }
            None => {
                self.last_report.remove(&key);
            }
        }
        if let Some(count) = self.submitted.get_mut(&report.reporter) {
            *count -= 1;
        }
    }

    /// Delete a report. Cooldowns and submission counters are left alone.
    pub(crate) fn remove(&mut self, feed_id: &FeedId, timestamp: Timestamp) -> Option<Report> {
        self.feeds.get_mut(feed_id)?.remove(timestamp)
    }
}

impl<T, S, G> Oracle<T, S, G>
where
    T: TokenLedger,
    S: StakingRegistry,
    G: Governance,
{
    /// Submit `value` as the report at position `nonce` of `feed_id`.
    ///
    /// On success the caller is paid the feed's pending tips plus the
    /// time-based reward accrued since the last accepted report on any feed,
    /// and the returned [`CurrentReward`] holds the amounts paid.
    ///
    /// # Errors
    ///
    /// - [`OracleError::NotStaked`] if the caller's stake is below threshold
    /// - [`OracleError::StaleNonce`] if `nonce` is not the feed's length
    /// - [`OracleError::CooldownActive`] if the caller reported to this feed
    ///   less than `mining_lock` seconds ago
    /// - [`OracleError::IdentifierMismatch`] if the descriptor does not match
    /// - [`OracleError::DuplicateTimestamp`] or
    ///   [`OracleError::NonMonotonicTimestamp`] if the feed already has a
    ///   report at or after this block's timestamp
    pub fn submit_value(
        &mut self,
        ctx: &TxContext,
        feed_id: FeedId,
        value: &[u8],
        nonce: u64,
        descriptor: &[u8],
    ) -> Result<CurrentReward> {
        let staked = self.staking.staked_balance(&ctx.caller);
        let required = self.staking.minimum_stake();
        if staked < required {
            return Err(OracleError::NotStaked { staked, required });
        }

        let expected = self.reports.count(&feed_id);
        if nonce != expected {
            return Err(OracleError::StaleNonce {
                expected,
                provided: nonce,
            });
        }

        if let Some(last_report) = self.reports.last_report_time(&ctx.caller, &feed_id) {
            if ctx.timestamp.saturating_sub(last_report) < self.params.mining_lock {
                return Err(OracleError::CooldownActive {
                    last_report,
                    now: ctx.timestamp,
                    mining_lock: self.params.mining_lock,
                });
            }
        }

        feed_id::validate(&feed_id, descriptor)?;
        self.reports.check_append(&feed_id, ctx.timestamp)?;

        // Accrual is measured from the previous accepted report.
        let reward = self.reward_at(&feed_id, ctx.timestamp);

        // Effects.
        let tip = self.tips.take(&feed_id);
        let undo = self.reports.record(
            feed_id,
            Report {
                timestamp: ctx.timestamp,
                value: value.to_vec(),
                reporter: ctx.caller,
                block_height: ctx.block_height,
            },
        );
        let previous_last_value =
            std::mem::replace(&mut self.params.time_of_last_new_value, ctx.timestamp);

        // Interaction.
        let payout = reward.total();
        if payout > 0 {
            let oracle = self.address;
            if let Err(err) = self.token.transfer(&oracle, &ctx.caller, payout) {
                self.params.time_of_last_new_value = previous_last_value;
                self.reports.unrecord(&feed_id, undo);
                self.tips.restore(&feed_id, tip);
                tracing::warn!(
                    feed_id = %feed_id,
                    reporter = %ctx.caller,
                    payout,
                    error = %err,
                    "reward payout failed, submission rolled back"
                );
                return Err(err);
            }
        }

        tracing::info!(
            feed_id = %feed_id,
            reporter = %ctx.caller,
            nonce,
            timestamp = ctx.timestamp,
            tip_paid = reward.tip,
            time_based_paid = reward.time_based,
            "new report"
        );
        self.emit(OracleEvent::NewReport {
            feed_id,
            timestamp: ctx.timestamp,
            value: value.to_vec(),
            nonce,
            reporter: ctx.caller,
            tip_paid: reward.tip,
            time_based_paid: reward.time_based,
        });
        Ok(reward)
    }

    /// Number of reports in a feed. Also the nonce for its next report.
    pub fn get_timestamp_count_by_id(&self, feed_id: &FeedId) -> u64 {
        self.reports.count(feed_id)
    }

    /// Current position of the report at exactly `timestamp`.
    pub fn get_timestamp_index_by_timestamp(
        &self,
        feed_id: &FeedId,
        timestamp: Timestamp,
    ) -> Option<u64> {
        self.reports
            .series(feed_id)?
            .index_of(timestamp)
            .map(|i| i as u64)
    }

    /// Timestamp of the report currently at position `index`.
    ///
    /// # Arguments
    ///
    /// * `feed_id` - Feed to look in
    /// * `index` - Zero-based position; shifts down when earlier reports are removed
    pub fn get_report_timestamp_by_index(&self, feed_id: &FeedId, index: u64) -> Option<Timestamp> {
        let index = usize::try_from(index).ok()?;
        self.reports
            .series(feed_id)?
            .get(index)
            .map(|r| r.timestamp)
    }

    /// Full report of `feed_id` submitted at `timestamp`.
    pub fn get_report_by_timestamp(&self, feed_id: &FeedId, timestamp: Timestamp) -> Option<&Report> {
        self.reports.series(feed_id)?.at(timestamp)
    }

    /// Value of the report of `feed_id` submitted at `timestamp`.
    pub fn get_value_by_timestamp(&self, feed_id: &FeedId, timestamp: Timestamp) -> Option<&[u8]> {
        self.get_report_by_timestamp(feed_id, timestamp)
            .map(|r| r.value.as_slice())
    }

    /// Newest report of `feed_id`.
    pub fn get_current_report(&self, feed_id: &FeedId) -> Option<&Report> {
        self.reports.series(feed_id)?.latest()
    }

    /// Value of the feed's newest report.
    pub fn get_current_value(&self, feed_id: &FeedId) -> Option<&[u8]> {
        self.get_current_report(feed_id).map(|r| r.value.as_slice())
    }

    /// Reporter of the report of `feed_id` submitted at `timestamp`.
    pub fn get_reporter_by_timestamp(&self, feed_id: &FeedId, timestamp: Timestamp) -> Option<Address> {
        self.get_report_by_timestamp(feed_id, timestamp)
            .map(|r| r.reporter)
    }

    /// Block height the report of `feed_id` at `timestamp` was mined in.
    pub fn get_block_number_by_timestamp(
        &self,
        feed_id: &FeedId,
        timestamp: Timestamp,
    ) -> Option<BlockHeight> {
        self.get_report_by_timestamp(feed_id, timestamp)
            .map(|r| r.block_height)
    }

    /// Lifetime count of accepted reports by `reporter` across all feeds.
    pub fn get_reports_submitted_by_address(&self, reporter: &Address) -> u64 {
        self.reports.submitted_by(reporter)
    }

    /// Time of `reporter`'s last accepted report to `feed_id`.
    pub fn get_reporter_last_timestamp(&self, reporter: &Address, feed_id: &FeedId) -> Option<Timestamp> {
        self.reports.last_report_time(reporter, feed_id)
    }

    /// Time of the newest accepted report on any feed. Baseline of the
    /// time-based reward.
    pub fn get_time_of_last_new_value(&self) -> Timestamp {
        self.params.time_of_last_new_value
    }
}
