//! Tip ledger with burn-on-contribution.
//!
//! A tip of `amount` is pulled from the contributor in full. Half is burned
//! immediately, half is credited to the feed's pending pool and paid to the
//! next reporter of that feed:
//!
//! ```text
//! burned   = amount / 2
//! credited = amount / 2
//! ```
//!
//! The odd base unit of an odd tip is never credited to a pool. It stays in
//! the oracle's account, where it funds time-based rewards.
//!
//! `tips_in_contract` always equals the sum of every feed's pending pool.

use std::collections::HashMap;

use tally_types::{Address, Amount, FeedId, OracleEvent};

use crate::collaborators::{Governance, StakingRegistry, TokenLedger, TxContext};
use crate::{feed_id, Oracle, OracleError, Result};

/// How a tip is divided between burn and pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TipSplit {
    /// Removed from total supply.
    pub burned: Amount,
    /// Added to the feed's pending pool.
    pub credited: Amount,
}

/// Split a tip into its burned and credited halves.
///
/// # Errors
///
/// - [`OracleError::ZeroAmount`] if `amount` is zero
pub fn split_tip(amount: Amount) -> Result<TipSplit> {
    if amount == 0 {
        return Err(OracleError::ZeroAmount);
    }
    Ok(TipSplit {
        burned: amount / 2,
        credited: amount / 2,
    })
}

/// Pending tips per feed and lifetime totals per contributor.
#[derive(Clone, Debug, Default)]
pub struct TipLedger {
    pending: HashMap<FeedId, Amount>,
    by_contributor: HashMap<Address, Amount>,
    total: Amount,
}

impl TipLedger {
    /// Credit `amount` to a feed's pool and the contributor's lifetime total.
    ///
    /// All three counters change or none do.
    pub fn credit(&mut self, feed_id: &FeedId, contributor: &Address, amount: Amount) -> Result<()> {
        let pending = self
            .pending_for(feed_id)
            .checked_add(amount)
            .ok_or(OracleError::Overflow)?;
        let lifetime = self
            .contributed_by(contributor)
            .checked_add(amount)
            .ok_or(OracleError::Overflow)?;
        let total = self.total.checked_add(amount).ok_or(OracleError::Overflow)?;

        self.pending.insert(*feed_id, pending);
        self.by_contributor.insert(*contributor, lifetime);
        self.total = total;
        Ok(())
    }

    /// Reverse a [`credit`](Self::credit) made in the same transaction.
    pub(crate) fn uncredit(&mut self, feed_id: &FeedId, contributor: &Address, amount: Amount) {
        if let Some(pending) = self.pending.get_mut(feed_id) {
            *pending -= amount;
        }
        if let Some(lifetime) = self.by_contributor.get_mut(contributor) {
            *lifetime -= amount;
        }
        self.total -= amount;
    }

    /// Zero a feed's pending pool and return what it held.
    pub fn take(&mut self, feed_id: &FeedId) -> Amount {
        let amount = self.pending.remove(feed_id).unwrap_or(0);
        self.total -= amount;
        amount
    }

    /// Put back a pool emptied by [`take`](Self::take) in the same transaction.
    pub(crate) fn restore(&mut self, feed_id: &FeedId, amount: Amount) {
        if amount == 0 {
            return;
        }
        self.pending.insert(*feed_id, amount);
        self.total += amount;
    }

    /// Unpaid tips of `feed_id`.
    pub fn pending_for(&self, feed_id: &FeedId) -> Amount {
        self.pending.get(feed_id).copied().unwrap_or(0)
    }

    /// Lifetime credited amount of `contributor`.
    pub fn contributed_by(&self, contributor: &Address) -> Amount {
        self.by_contributor.get(contributor).copied().unwrap_or(0)
    }

    /// Sum of every feed's pending pool.
    pub fn total(&self) -> Amount {
        self.total
    }
}

impl<T, S, G> Oracle<T, S, G>
where
    T: TokenLedger,
    S: StakingRegistry,
    G: Governance,
{
    /// Post a tip of `amount` against `feed_id`.
    ///
    /// `descriptor` must hash to `feed_id` when the id is content-addressed and
    /// is ignored for legacy ids.
    ///
    /// # Errors
    ///
    /// - [`OracleError::ZeroAmount`] if `amount` is zero
    /// - [`OracleError::IdentifierMismatch`] if the descriptor does not match
    /// - [`OracleError::InsufficientBalance`] if the caller cannot fund `amount`
    pub fn add_tip(
        &mut self,
        ctx: &TxContext,
        feed_id: FeedId,
        amount: Amount,
        descriptor: &[u8],
    ) -> Result<()> {
        let split = split_tip(amount)?;
        feed_id::validate(&feed_id, descriptor)?;
        let available = self.token.balance_of(&ctx.caller);
        if available < amount {
            return Err(OracleError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        self.tips.credit(&feed_id, &ctx.caller, split.credited)?;
        if let Err(err) = self.collect_tip(&ctx.caller, amount, split.burned) {
            self.tips.uncredit(&feed_id, &ctx.caller, split.credited);
            return Err(err);
        }

        tracing::info!(
            feed_id = %feed_id,
            contributor = %ctx.caller,
            amount,
            burned = split.burned,
            pending = self.tips.pending_for(&feed_id),
            "tip added"
        );
        self.emit(OracleEvent::TipAdded {
            feed_id,
            contributor: ctx.caller,
            amount,
            burned: split.burned,
            credited: split.credited,
        });
        Ok(())
    }

    /// Pull the full tip into the oracle account, then burn its share.
    ///
    /// A failed burn refunds the contributor and returns the burn error.
    fn collect_tip(&mut self, from: &Address, amount: Amount, burn: Amount) -> Result<()> {
        let oracle = self.address;
        self.token.transfer(from, &oracle, amount)?;
        if let Err(err) = self.token.burn(&oracle, burn) {
            if let Err(refund_err) = self.token.transfer(&oracle, from, amount) {
                tracing::error!(
                    contributor = %from,
                    amount,
                    error = %refund_err,
                    "tip refund failed after burn failure"
                );
            }
            return Err(err);
        }
        Ok(())
    }

    /// Pending (unpaid) tips for a feed.
    pub fn get_tips_by_id(&self, feed_id: &FeedId) -> Amount {
        self.tips.pending_for(feed_id)
    }

    /// Lifetime amount credited from `contributor`'s tips, across all feeds.
    pub fn get_tips_by_user(&self, contributor: &Address) -> Amount {
        self.tips.contributed_by(contributor)
    }

    /// Sum of all feeds' pending tips.
    pub fn tips_in_contract(&self) -> Amount {
        self.tips.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::principal;
    use crate::testutil::{deploy, deploy_flaky, tokens, DEPLOYED_AT};

    #[test]
    fn test_split_even() {
        let split = split_tip(100).expect("split");
        assert_eq!(split, TipSplit { burned: 50, credited: 50 });
    }

    #[test]
    fn test_split_odd_keeps_remainder_out_of_pool() {
        let split = split_tip(101).expect("split");
        assert_eq!(split.burned, 50);
        assert_eq!(split.credited, 50);
    }

    #[test]
    fn test_split_zero_rejected() {
        assert!(matches!(split_tip(0), Err(OracleError::ZeroAmount)));
    }

    #[test]
    fn test_ledger_take_zeroes_pool() {
        let mut ledger = TipLedger::default();
        let alice = principal("alice");
        ledger.credit(&FeedId::from_u64(1), &alice, 50).expect("credit");
        ledger.credit(&FeedId::from_u64(2), &alice, 25).expect("credit");
        assert_eq!(ledger.total(), 75);

        assert_eq!(ledger.take(&FeedId::from_u64(1)), 50);
        assert_eq!(ledger.pending_for(&FeedId::from_u64(1)), 0);
        assert_eq!(ledger.total(), 25);
        assert_eq!(ledger.contributed_by(&alice), 75);
        assert_eq!(ledger.take(&FeedId::from_u64(1)), 0);
    }

    #[test]
    fn test_ledger_credit_overflow_is_atomic() {
        let mut ledger = TipLedger::default();
        let alice = principal("alice");
        let bob = principal("bob");
        ledger.credit(&FeedId::from_u64(1), &alice, Amount::MAX).expect("credit");
        let err = ledger
            .credit(&FeedId::from_u64(2), &bob, 1)
            .expect_err("total overflows");
        assert!(matches!(err, OracleError::Overflow));
        assert_eq!(ledger.pending_for(&FeedId::from_u64(2)), 0);
        assert_eq!(ledger.contributed_by(&bob), 0);
    }

    #[test]
    fn test_add_tip_burns_half() {
        let mut oracle = deploy();
        let alice = principal("alice");
        oracle.token_mut().mint(&alice, tokens(200));
        let supply = oracle.token().total_supply();

        let ctx = TxContext::new(alice, DEPLOYED_AT + 1, 2);
        oracle
            .add_tip(&ctx, FeedId::from_u64(1), tokens(100), b"")
            .expect("tip");

        assert_eq!(oracle.get_tips_by_id(&FeedId::from_u64(1)), tokens(50));
        assert_eq!(oracle.get_tips_by_user(&alice), tokens(50));
        assert_eq!(oracle.tips_in_contract(), tokens(50));
        assert_eq!(oracle.token().total_supply(), supply - tokens(50));
        assert_eq!(oracle.token().balance_of(&alice), tokens(100));
        assert_eq!(oracle.token().balance_of(&oracle.address()), tokens(50));
    }

    #[test]
    fn test_add_tip_content_addressed() {
        let mut oracle = deploy();
        let alice = principal("alice");
        oracle.token_mut().mint(&alice, tokens(200));
        let ctx = TxContext::new(alice, DEPLOYED_AT + 1, 2);
        let id = feed_id::descriptor_id(b"This is a test");

        let err = oracle
            .add_tip(&ctx, id, tokens(100), b"")
            .expect_err("descriptor required");
        assert!(matches!(err, OracleError::IdentifierMismatch { .. }));
        assert_eq!(oracle.tips_in_contract(), 0);

        oracle
            .add_tip(&ctx, id, tokens(100), b"This is a test")
            .expect("tip");
        assert_eq!(oracle.get_tips_by_id(&id), tokens(50));
    }

    #[test]
    fn test_add_tip_requires_funds() {
        let mut oracle = deploy();
        let alice = principal("alice");
        let ctx = TxContext::new(alice, DEPLOYED_AT + 1, 2);
        let err = oracle
            .add_tip(&ctx, FeedId::from_u64(1), 2, b"")
            .expect_err("no funds");
        assert!(matches!(
            err,
            OracleError::InsufficientBalance { required: 2, available: 0 }
        ));
        assert!(oracle.events().is_empty());
    }

    #[test]
    fn test_add_tip_zero_rejected() {
        let mut oracle = deploy();
        let alice = principal("alice");
        oracle.token_mut().mint(&alice, tokens(1));
        let ctx = TxContext::new(alice, DEPLOYED_AT + 1, 2);
        let err = oracle
            .add_tip(&ctx, FeedId::from_u64(1), 0, b"")
            .expect_err("zero tip");
        assert!(matches!(err, OracleError::ZeroAmount));
    }

    #[test]
    fn test_tips_accumulate() {
        let mut oracle = deploy();
        let alice = principal("alice");
        oracle.token_mut().mint(&alice, tokens(100));
        let ctx = TxContext::new(alice, DEPLOYED_AT + 1, 2);
        oracle.add_tip(&ctx, FeedId::from_u64(1), 500, b"").expect("tip");
        oracle.add_tip(&ctx, FeedId::from_u64(1), 500, b"").expect("tip");
        assert_eq!(oracle.get_tips_by_id(&FeedId::from_u64(1)), 500);
        assert_eq!(oracle.get_tips_by_user(&alice), 500);
        assert_eq!(oracle.events().len(), 2);
    }

    #[test]
    fn test_failed_burn_refunds_and_uncredits() {
        let mut oracle = deploy_flaky();
        let alice = principal("alice");
        oracle.token_mut().inner.mint(&alice, tokens(100));
        oracle.token_mut().refuse_burns = true;
        let supply = oracle.token().total_supply();

        let ctx = TxContext::new(alice, DEPLOYED_AT + 1, 2);
        let err = oracle
            .add_tip(&ctx, FeedId::from_u64(1), tokens(100), b"")
            .expect_err("burn refused");
        assert!(matches!(err, OracleError::Token(msg) if msg == "burns disabled"));

        assert_eq!(oracle.token().balance_of(&alice), tokens(100));
        assert_eq!(oracle.token().balance_of(&oracle.address()), 0);
        assert_eq!(oracle.token().total_supply(), supply);
        assert_eq!(oracle.get_tips_by_id(&FeedId::from_u64(1)), 0);
        assert_eq!(oracle.get_tips_by_user(&alice), 0);
        assert_eq!(oracle.tips_in_contract(), 0);
        assert!(oracle.events().is_empty());
    }

    #[test]
    fn test_failed_refund_keeps_burn_error() {
        let mut oracle = deploy_flaky();
        let alice = principal("alice");
        oracle.token_mut().inner.mint(&alice, tokens(100));
        let oracle_address = oracle.address();
        oracle.token_mut().refuse_burns = true;
        oracle.token_mut().refuse_transfers_from = Some(oracle_address);

        let ctx = TxContext::new(alice, DEPLOYED_AT + 1, 2);
        let err = oracle
            .add_tip(&ctx, FeedId::from_u64(1), tokens(100), b"")
            .expect_err("burn refused");
        assert!(matches!(err, OracleError::Token(msg) if msg == "burns disabled"));
        assert_eq!(oracle.tips_in_contract(), 0);
        assert_eq!(oracle.get_tips_by_user(&alice), 0);
    }

    #[test]
    fn test_failed_pull_leaves_ledger() {
        let mut oracle = deploy_flaky();
        let alice = principal("alice");
        oracle.token_mut().inner.mint(&alice, tokens(100));
        oracle.token_mut().refuse_transfers_from = Some(alice);

        let ctx = TxContext::new(alice, DEPLOYED_AT + 1, 2);
        let err = oracle
            .add_tip(&ctx, FeedId::from_u64(1), tokens(100), b"")
            .expect_err("transfer refused");
        assert!(matches!(err, OracleError::Token(_)));
        assert_eq!(oracle.token().balance_of(&alice), tokens(100));
        assert_eq!(oracle.tips_in_contract(), 0);
        assert_eq!(oracle.get_tips_by_user(&alice), 0);
    }
}
