//! Governance-only maintenance.
//!
//! Governance excises disputed reports and retunes the cooldown and the
//! time-based reward rate. Removing a report compacts its feed and never
//! claws back rewards already paid for it.

use tally_types::{Amount, FeedId, OracleEvent, Report, Timestamp};

use crate::collaborators::{Governance, StakingRegistry, TokenLedger, TxContext};
use crate::{Oracle, OracleError, Result};

impl<T, S, G> Oracle<T, S, G>
where
    T: TokenLedger,
    S: StakingRegistry,
    G: Governance,
{
    fn require_governance(&self, ctx: &TxContext, action: &'static str) -> Result<()> {
        if self.governance.is_governance(&ctx.caller) {
            return Ok(());
        }
        tracing::warn!(caller = %ctx.caller, action, "governance check failed");
        Err(OracleError::Unauthorized(ctx.caller))
    }

    /// Delete the report of `feed_id` at `timestamp`.
    ///
    /// Every later report of the feed moves down one index.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`] if the caller is not governance
    /// - [`OracleError::NotFound`] if the feed has no report at `timestamp`
    pub fn remove_value(
        &mut self,
        ctx: &TxContext,
        feed_id: FeedId,
        timestamp: Timestamp,
    ) -> Result<Report> {
        self.require_governance(ctx, "remove_value")?;
        let removed = self
            .reports
            .remove(&feed_id, timestamp)
            .ok_or(OracleError::NotFound { feed_id, timestamp })?;

        tracing::info!(
            feed_id = %feed_id,
            timestamp,
            reporter = %removed.reporter,
            remaining = self.reports.count(&feed_id),
            "report removed"
        );
        self.emit(OracleEvent::ValueRemoved {
            feed_id,
            timestamp,
            reporter: removed.reporter,
        });
        Ok(removed)
    }

    /// Replace the reporter cooldown.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`] if the caller is not governance
    pub fn change_mining_lock(&mut self, ctx: &TxContext, seconds: u64) -> Result<()> {
        self.require_governance(ctx, "change_mining_lock")?;
        let old = std::mem::replace(&mut self.params.mining_lock, seconds);
        tracing::info!(old, new = seconds, "mining lock changed");
        self.emit(OracleEvent::MiningLockChanged { old, new: seconds });
        Ok(())
    }

    /// Replace the time-based reward per interval.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`] if the caller is not governance
    pub fn change_time_based_reward(&mut self, ctx: &TxContext, amount: Amount) -> Result<()> {
        self.require_governance(ctx, "change_time_based_reward")?;
        let old = std::mem::replace(&mut self.params.time_based_reward, amount);
        tracing::info!(old, new = amount, "time-based reward changed");
        self.emit(OracleEvent::TimeBasedRewardChanged { old, new: amount });
        Ok(())
    }
}
