//! The oracle ledger.
//!
//! [`Oracle`] owns the tip ledger, the report store and the global
//! parameters, together with handles to the external token ledger, staking
//! registry and governance capability. Its operations are spread over the
//! [`tips`](crate::tips), [`submission`](crate::submission),
//! [`rewards`](crate::rewards) and [`maintenance`](crate::maintenance)
//! modules.

use tally_types::{Address, OracleEvent, Timestamp, VERIFY_SENTINEL};

use crate::collaborators::{Governance, StakingRegistry, TokenLedger};
use crate::params::OracleParams;
use crate::submission::ReportStore;
use crate::tips::TipLedger;
use crate::OracleConfig;

/// Oracle ledger state plus its injected collaborators.
#[derive(Debug)]
pub struct Oracle<T, S, G> {
    /// The oracle's own token account.
    pub(crate) address: Address,
    pub(crate) token: T,
    pub(crate) staking: S,
    pub(crate) governance: G,
    pub(crate) params: OracleParams,
    pub(crate) tips: TipLedger,
    pub(crate) reports: ReportStore,
    pub(crate) events: Vec<OracleEvent>,
}

impl<T, S, G> Oracle<T, S, G>
where
    T: TokenLedger,
    S: StakingRegistry,
    G: Governance,
{
    /// Deploy an oracle at `deployed_at`.
    ///
    /// The time-based reward clock starts at the deployment time.
    ///
    /// # Arguments
    ///
    /// * `config` - Oracle account and initial parameters
    /// * `deployed_at` - Timestamp of the deployment block
    /// * `token` - Token ledger holding tips and reward funds
    /// * `staking` - Registry gating who may report
    /// * `governance` - Capability allowed to run maintenance
    pub fn new(
        config: &OracleConfig,
        deployed_at: Timestamp,
        token: T,
        staking: S,
        governance: G,
    ) -> Self {
        tracing::info!(
            address = %config.address,
            mining_lock = config.mining_lock_secs,
            time_based_reward = config.time_based_reward,
            deployed_at,
            "oracle deployed"
        );
        Self {
            address: config.address,
            token,
            staking,
            governance,
            params: OracleParams::from_config(config, deployed_at),
            tips: TipLedger::default(),
            reports: ReportStore::default(),
            events: Vec::new(),
        }
    }

    /// The oracle's own token account.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Constant used by external callers to confirm they address an oracle.
    pub fn verify(&self) -> u64 {
        VERIFY_SENTINEL
    }

    /// Current governance-mutable parameters.
    pub fn params(&self) -> &OracleParams {
        &self.params
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[OracleEvent] {
        &self.events
    }

    /// The token ledger.
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Mutable access to the token ledger, for hosts that share it.
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    /// The staking registry.
    pub fn staking(&self) -> &S {
        &self.staking
    }

    /// Mutable access to the staking registry, for hosts that share it.
    pub fn staking_mut(&mut self) -> &mut S {
        &mut self.staking
    }

    /// The governance capability.
    pub fn governance(&self) -> &G {
        &self.governance
    }

    pub(crate) fn emit(&mut self, event: OracleEvent) {
        tracing::trace!(?event, "oracle event");
        self.events.push(event);
    }
}
