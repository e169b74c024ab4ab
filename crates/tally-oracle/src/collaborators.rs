//! Interfaces to the systems the oracle depends on but does not own.
//!
//! The token ledger, staking registry and governance capability live outside
//! the oracle. They are injected into [`Oracle`](crate::Oracle) so the ledger
//! can run against live systems or the in-memory [`stub`](crate::stub)s.

use tally_types::{Address, Amount, BlockHeight, Timestamp};

use crate::Result;

/// Fungible token ledger used for tips, burns and reward payouts.
pub trait TokenLedger {
    /// Current balance of `account`.
    fn balance_of(&self, account: &Address) -> Amount;

    /// Move `amount` from `from` to `to`.
    ///
    /// Must leave both balances untouched when it fails.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()>;

    /// Destroy `amount` held by `from`, reducing total supply.
    fn burn(&mut self, from: &Address, amount: Amount) -> Result<()>;

    /// Tokens in existence, net of every burn.
    fn total_supply(&self) -> Amount;
}

/// Reporter staking registry.
pub trait StakingRegistry {
    /// Amount `reporter` currently has staked.
    fn staked_balance(&self, reporter: &Address) -> Amount;

    /// Stake a reporter needs to be allowed to submit.
    fn minimum_stake(&self) -> Amount;
}

/// The single principal allowed to perform maintenance.
pub trait Governance {
    /// Whether `caller` holds the governance capability.
    fn is_governance(&self, caller: &Address) -> bool;
}

/// Execution context of one transaction, supplied by the host environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxContext {
    /// Principal that signed the call.
    pub caller: Address,
    /// Block timestamp in seconds.
    pub timestamp: Timestamp,
    pub block_height: BlockHeight,
}

impl TxContext {
    /// Create a transaction context.
    ///
    /// # Arguments
    ///
    /// * `caller` - Principal that signed the call
    /// * `timestamp` - Timestamp of the block the call executes in
    /// * `block_height` - Height of that block
    pub fn new(caller: Address, timestamp: Timestamp, block_height: BlockHeight) -> Self {
        Self {
            caller,
            timestamp,
            block_height,
        }
    }
}
