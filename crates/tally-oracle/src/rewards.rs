//! Reward computation.
//!
//! A reporter is paid two components when their report is accepted:
//!
//! ```text
//! tip        = pending tips of the feed
//! time_based = min(rate * (now - time_of_last_new_value) / 300, disbursable)
//! disbursable = oracle balance - tips_in_contract
//! ```
//!
//! The time-based component accrues from the newest accepted report on any
//! feed. Nothing unpaid is carried over: if the oracle cannot fund the full
//! accrual, the shortfall is forfeited and the next report accrues from the
//! new baseline.

use serde::{Deserialize, Serialize};
use tally_types::{Amount, FeedId, Timestamp, REWARD_INTERVAL_SECS};

use crate::collaborators::{Governance, StakingRegistry, TokenLedger};
use crate::Oracle;

/// Reward a report would earn (or earned) for one feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentReward {
    /// Pending tips of the feed.
    pub tip: Amount,
    /// Funded part of the time-based accrual.
    pub time_based: Amount,
}

impl CurrentReward {
    /// Amount transferred to the reporter.
    pub fn total(&self) -> Amount {
        self.tip.saturating_add(self.time_based)
    }
}

/// Time-based reward accrued between `since` and `now`, before funding.
///
/// Truncating division; saturates instead of overflowing.
pub fn accrued_time_based(rate: Amount, since: Timestamp, now: Timestamp) -> Amount {
    let elapsed = Amount::from(now.saturating_sub(since));
    rate.saturating_mul(elapsed) / Amount::from(REWARD_INTERVAL_SECS)
}

/// Balance the oracle may pay as time-based rewards: everything it holds
/// that is not earmarked as pending tips.
pub fn disbursable_balance(oracle_balance: Amount, tips_in_contract: Amount) -> Amount {
    oracle_balance.saturating_sub(tips_in_contract)
}

/// Combine a feed's pending tips with the funded time-based accrual.
pub fn compute_reward(
    pending_tip: Amount,
    accrued: Amount,
    oracle_balance: Amount,
    tips_in_contract: Amount,
) -> CurrentReward {
    let available = disbursable_balance(oracle_balance, tips_in_contract);
    CurrentReward {
        tip: pending_tip,
        time_based: accrued.min(available),
    }
}

impl<T, S, G> Oracle<T, S, G>
where
    T: TokenLedger,
    S: StakingRegistry,
    G: Governance,
{
    /// Reward a report to `feed_id` would earn at `now`. Read-only.
    pub fn get_current_reward(&self, feed_id: &FeedId, now: Timestamp) -> CurrentReward {
        self.reward_at(feed_id, now)
    }

    /// Configured time-based reward per interval.
    pub fn get_time_based_reward(&self) -> Amount {
        self.params.time_based_reward
    }

    /// Configured reporter cooldown in seconds.
    pub fn mining_lock(&self) -> u64 {
        self.params.mining_lock
    }

    pub(crate) fn reward_at(&self, feed_id: &FeedId, now: Timestamp) -> CurrentReward {
        let accrued = accrued_time_based(
            self.params.time_based_reward,
            self.params.time_of_last_new_value,
            now,
        );
        let reward = compute_reward(
            self.tips.pending_for(feed_id),
            accrued,
            self.token.balance_of(&self.address),
            self.tips.total(),
        );
        tracing::debug!(
            feed_id = %feed_id,
            tip = reward.tip,
            accrued,
            time_based = reward.time_based,
            "reward computed"
        );
        reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::TxContext;
    use crate::stub::principal;
    use crate::testutil::{deploy, staked, tokens, DEPLOYED_AT};

    #[test]
    fn test_accrued_formula() {
        assert_eq!(accrued_time_based(300, 0, 300), 300);
        assert_eq!(accrued_time_based(300, 0, 299), 299);
        assert_eq!(accrued_time_based(1, 0, 299), 0);
        assert_eq!(accrued_time_based(5, 1_000, 1_600), 10);
    }

    #[test]
    fn test_accrued_clock_before_baseline() {
        assert_eq!(accrued_time_based(1_000, 2_000, 1_000), 0);
    }

    #[test]
    fn test_accrued_saturates() {
        assert_eq!(
            accrued_time_based(Amount::MAX, 0, 600),
            Amount::MAX / 300
        );
    }

    #[test]
    fn test_disbursable_excludes_tips() {
        assert_eq!(disbursable_balance(100, 40), 60);
        assert_eq!(disbursable_balance(40, 40), 0);
        assert_eq!(disbursable_balance(10, 40), 0);
    }

    #[test]
    fn test_compute_reward_caps_time_based() {
        let reward = compute_reward(50, 1_000, 80, 50);
        assert_eq!(reward.tip, 50);
        assert_eq!(reward.time_based, 30);
        assert_eq!(reward.total(), 80);
    }

    #[test]
    fn test_unfunded_accrual_reports_zero() {
        let mut oracle = deploy();
        let alice = principal("alice");
        oracle.token_mut().mint(&alice, tokens(5));
        oracle
            .add_tip(&TxContext::new(alice, DEPLOYED_AT, 1), FeedId::from_u64(1), tokens(5), b"")
            .expect("tip");

        let reward = oracle.get_current_reward(&FeedId::from_u64(1), DEPLOYED_AT + 10_000);
        assert_eq!(reward.tip, tokens(5) / 2);
        assert_eq!(reward.time_based, 0);

        let oracle_address = oracle.address();
        oracle.token_mut().mint(&oracle_address, tokens(100));
        let reward = oracle.get_current_reward(&FeedId::from_u64(1), DEPLOYED_AT + 10_000);
        let expected = oracle.get_time_based_reward() * 10_000 / 300;
        assert_eq!(reward.tip, tokens(5) / 2);
        assert_eq!(reward.time_based, expected);
    }

    #[test]
    fn test_settlement_pays_reporter() {
        let mut oracle = deploy();
        let alice = staked(&mut oracle, "alice");
        let bob = principal("bob");
        let f1 = FeedId::from_u64(1);
        let oracle_address = oracle.address();
        oracle.token_mut().mint(&oracle_address, tokens(200));
        oracle.token_mut().mint(&bob, tokens(10));
        oracle
            .add_tip(&TxContext::new(bob, DEPLOYED_AT, 1), f1, tokens(10), b"")
            .expect("tip");

        let now = DEPLOYED_AT + 600;
        let before = oracle.token().balance_of(&alice);
        let paid = oracle
            .submit_value(&TxContext::new(alice, now, 2), f1, b"150", 0, b"")
            .expect("submit");

        let accrual = oracle.get_time_based_reward() * 2;
        assert_eq!(paid.tip, tokens(5));
        assert_eq!(paid.time_based, accrual);
        assert_eq!(oracle.token().balance_of(&alice), before + tokens(5) + accrual);
        assert_eq!(oracle.get_tips_by_id(&f1), 0);
        assert_eq!(oracle.tips_in_contract(), 0);

        // Baseline moved: nothing accrues at the same instant.
        assert_eq!(oracle.get_current_reward(&f1, now).time_based, 0);
    }

    #[test]
    fn test_settlement_bounded_by_funding() {
        let mut oracle = deploy();
        let alice = staked(&mut oracle, "alice");
        let oracle_address = oracle.address();
        oracle.token_mut().mint(&oracle_address, 7);

        let paid = oracle
            .submit_value(
                &TxContext::new(alice, DEPLOYED_AT + 86_400, 2),
                FeedId::from_u64(1),
                b"150",
                0,
                b"",
            )
            .expect("submit");
        assert_eq!(paid.time_based, 7);
        assert_eq!(oracle.token().balance_of(&alice), 7);
        assert_eq!(oracle.token().balance_of(&oracle_address), 0);
    }
}
