//! In-memory collaborators.
//!
//! The token ledger, staking registry and governance capability are external
//! systems. These stubs implement their interfaces over plain maps so the
//! oracle can be exercised without a live ledger. The `mint`, `deposit_stake`
//! and `set_minimum_stake` helpers stand in for operations that belong to
//! those external systems.

use std::collections::HashMap;

use tally_crypto::blake3;
use tally_types::{Address, Amount};

use crate::collaborators::{Governance, StakingRegistry, TokenLedger};
use crate::{OracleError, Result};

/// Deterministic address for a human-readable label.
pub fn principal(label: &str) -> Address {
    Address::new(blake3::derive_key(
        blake3::contexts::PRINCIPAL_LABEL,
        label.as_bytes(),
    ))
}

/// Map-backed token ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryToken {
    balances: HashMap<Address, Amount>,
    total_supply: Amount,
}

impl MemoryToken {
    /// An empty ledger with zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` new tokens in `to`.
    pub fn mint(&mut self, to: &Address, amount: Amount) {
        *self.balances.entry(*to).or_default() += amount;
        self.total_supply += amount;
    }

    fn debit(&mut self, from: &Address, amount: Amount) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(OracleError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        self.balances.insert(*from, available - amount);
        Ok(())
    }
}

impl TokenLedger for MemoryToken {
    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        self.debit(from, amount)?;
        *self.balances.entry(*to).or_default() += amount;
        Ok(())
    }

    fn burn(&mut self, from: &Address, amount: Amount) -> Result<()> {
        self.debit(from, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }
}

/// Map-backed staking registry with a single global threshold.
#[derive(Debug, Clone, Default)]
pub struct MemoryStaking {
    stakes: HashMap<Address, Amount>,
    minimum_stake: Amount,
}

impl MemoryStaking {
    /// A registry with no stakes and the given threshold.
    pub fn with_minimum_stake(minimum_stake: Amount) -> Self {
        Self {
            stakes: HashMap::new(),
            minimum_stake,
        }
    }

    /// Add `amount` to `reporter`'s stake.
    pub fn deposit_stake(&mut self, reporter: &Address, amount: Amount) {
        *self.stakes.entry(*reporter).or_default() += amount;
    }

    /// Replace the stake threshold.
    pub fn set_minimum_stake(&mut self, amount: Amount) {
        tracing::info!(minimum_stake = amount, "stub staking: threshold changed");
        self.minimum_stake = amount;
    }
}

impl StakingRegistry for MemoryStaking {
    fn staked_balance(&self, reporter: &Address) -> Amount {
        self.stakes.get(reporter).copied().unwrap_or(0)
    }

    fn minimum_stake(&self) -> Amount {
        self.minimum_stake
    }
}

/// Governance capability held by one fixed principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedGovernance {
    authority: Address,
}

impl FixedGovernance {
    /// Grant the capability to `authority`.
    pub fn new(authority: Address) -> Self {
        Self { authority }
    }

    /// The principal holding the capability.
    pub fn authority(&self) -> Address {
        self.authority
    }
}

impl Governance for FixedGovernance {
    fn is_governance(&self, caller: &Address) -> bool {
        *caller == self.authority
    }
}
