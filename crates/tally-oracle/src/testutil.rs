//! Shared fixtures for unit tests.

use tally_types::{Address, Amount, Timestamp, BASE_UNITS_PER_TOKEN};

use crate::collaborators::{TokenLedger, TxContext};
use crate::stub::{principal, FixedGovernance, MemoryStaking, MemoryToken};
use crate::{Oracle, OracleConfig, OracleError, Result};

pub(crate) type TestOracle = Oracle<MemoryToken, MemoryStaking, FixedGovernance>;

pub(crate) type FlakyOracle = Oracle<FlakyToken, MemoryStaking, FixedGovernance>;

pub(crate) const DEPLOYED_AT: Timestamp = 1_700_000_000;

pub(crate) const MIN_STAKE: Amount = 100 * BASE_UNITS_PER_TOKEN;

pub(crate) fn tokens(n: u128) -> Amount {
    n * BASE_UNITS_PER_TOKEN
}

pub(crate) fn deploy() -> TestOracle {
    Oracle::new(
        &OracleConfig::default(),
        DEPLOYED_AT,
        MemoryToken::new(),
        MemoryStaking::with_minimum_stake(MIN_STAKE),
        FixedGovernance::new(principal("governance")),
    )
}

/// A reporter holding exactly the minimum stake.
pub(crate) fn staked(oracle: &mut TestOracle, label: &str) -> Address {
    let reporter = principal(label);
    oracle.staking_mut().deposit_stake(&reporter, MIN_STAKE);
    reporter
}

pub(crate) fn governance_ctx(timestamp: Timestamp) -> TxContext {
    TxContext::new(principal("governance"), timestamp, 1)
}

/// Token ledger that can be told to refuse outgoing transfers from one
/// account, or every burn.
#[derive(Debug, Default)]
pub(crate) struct FlakyToken {
    pub(crate) inner: MemoryToken,
    pub(crate) refuse_transfers_from: Option<Address>,
    pub(crate) refuse_burns: bool,
}

impl TokenLedger for FlakyToken {
    fn balance_of(&self, account: &Address) -> Amount {
        self.inner.balance_of(account)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        if self.refuse_transfers_from == Some(*from) {
            return Err(OracleError::Token(format!("transfers from {from} frozen")));
        }
        self.inner.transfer(from, to, amount)
    }

    fn burn(&mut self, from: &Address, amount: Amount) -> Result<()> {
        if self.refuse_burns {
            return Err(OracleError::Token("burns disabled".to_string()));
        }
        self.inner.burn(from, amount)
    }

    fn total_supply(&self) -> Amount {
        self.inner.total_supply()
    }
}

pub(crate) fn deploy_flaky() -> FlakyOracle {
    Oracle::new(
        &OracleConfig::default(),
        DEPLOYED_AT,
        FlakyToken::default(),
        MemoryStaking::with_minimum_stake(MIN_STAKE),
        FixedGovernance::new(principal("governance")),
    )
}
