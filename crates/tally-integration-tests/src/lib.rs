//! Integration test crate for the Tally oracle.
//!
//! Holds a small simulated chain used by the end-to-end scenarios under
//! `tests/`. Every transaction is mined in its own block one second after the
//! previous one, and [`Chain::advance_time`] skips ahead between blocks.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p tally-integration-tests
//! ```

use tally_oracle::stub::{principal, FixedGovernance, MemoryStaking, MemoryToken};
use tally_oracle::{Oracle, OracleConfig, TokenLedger, TxContext};
use tally_types::{Address, Amount, BlockHeight, Timestamp, BASE_UNITS_PER_TOKEN};

/// Timestamp of the deployment block.
pub const GENESIS_TIME: Timestamp = 1_700_000_000;

/// Stake every reporter deposits.
pub const STAKE: Amount = 100 * BASE_UNITS_PER_TOKEN;

/// Oracle wired to the in-memory collaborators.
pub type MemoryOracle = Oracle<MemoryToken, MemoryStaking, FixedGovernance>;

/// Whole tokens in base units.
pub fn tokens(n: u128) -> Amount {
    n * BASE_UNITS_PER_TOKEN
}

/// Install a test-writer subscriber once per process. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tally_oracle=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// The oracle plus a block clock.
pub struct Chain {
    pub oracle: MemoryOracle,
    now: Timestamp,
    height: BlockHeight,
}

impl Chain {
    /// Deploy with the default configuration.
    pub fn deploy() -> Self {
        Self::deploy_with(&OracleConfig::default())
    }

    /// Deploy at [`GENESIS_TIME`] with `config`.
    pub fn deploy_with(config: &OracleConfig) -> Self {
        init_tracing();
        let oracle = Oracle::new(
            config,
            GENESIS_TIME,
            MemoryToken::new(),
            MemoryStaking::with_minimum_stake(STAKE),
            FixedGovernance::new(Self::governance()),
        );
        Self {
            oracle,
            now: GENESIS_TIME,
            height: 1,
        }
    }

    /// The principal holding the governance capability.
    pub fn governance() -> Address {
        principal("governance")
    }

    /// Context for the next transaction, mined in a fresh block.
    pub fn tx(&mut self, caller: Address) -> TxContext {
        self.now += 1;
        self.height += 1;
        TxContext::new(caller, self.now, self.height)
    }

    /// Context for a governance transaction.
    pub fn governance_tx(&mut self) -> TxContext {
        self.tx(Self::governance())
    }

    /// Skip `secs` seconds before the next transaction.
    pub fn advance_time(&mut self, secs: u64) {
        self.now += secs;
    }

    /// Timestamp of the latest block.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Mint `amount` into `account`.
    pub fn fund(&mut self, account: &Address, amount: Amount) {
        self.oracle.token_mut().mint(account, amount);
    }

    /// Send tokens to the oracle to fund time-based rewards.
    pub fn fund_oracle(&mut self, amount: Amount) {
        let oracle = self.oracle.address();
        self.fund(&oracle, amount);
    }

    /// A labelled reporter with [`STAKE`] deposited.
    pub fn staked_reporter(&mut self, label: &str) -> Address {
        let reporter = principal(label);
        self.oracle.staking_mut().deposit_stake(&reporter, STAKE);
        reporter
    }

    /// Token balance of `account`.
    pub fn balance(&self, account: &Address) -> Amount {
        self.oracle.token().balance_of(account)
    }
}
