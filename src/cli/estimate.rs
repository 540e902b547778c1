use tracing::{debug, info};

use super::Cli;
use crate::client::{ChainDataSource, ChainSnapshot, RpcClient, StaticChainData};
use crate::config::InflationConfig;
use crate::economics::report::{format_thousands, StdoutProgress};
use crate::economics::{ProgressSink, RewardSplit, SimulationOutcome, SimulationParams, Simulator};
use crate::error::{InflationError, Result};

/// The long-term pass counts years of 364 days.
const DAYS_PER_LONG_TERM_YEAR: i64 = 364;

pub fn data_source(cli: &Cli) -> Result<Box<dyn ChainDataSource>> {
    if cli.offline {
        let missing = |flag: &str| InflationError::ConfigInvalid(format!("--offline needs --{}", flag));
        let snapshot = ChainSnapshot {
            head_block_number: cli.head_block.ok_or_else(|| missing("head-block"))?,
            virtual_supply: cli.virtual_supply.ok_or_else(|| missing("virtual-supply"))?,
            split: RewardSplit::new(
                cli.worker_pct.ok_or_else(|| missing("worker-pct"))?,
                cli.witness_pct.ok_or_else(|| missing("witness-pct"))?,
                cli.vesting_pct.ok_or_else(|| missing("vesting-pct"))?,
            ),
        };
        return Ok(Box::new(StaticChainData(snapshot)));
    }

    let config = InflationConfig::load(&cli.config)?;
    info!("Using API nodes: {:?}", config.node.urls);
    Ok(Box::new(RpcClient::from_config(&config.node)?))
}

/// Applies the `--virtual-supply` override on top of what the chain reported.
pub fn starting_state(mut snapshot: ChainSnapshot, supply_override: Option<f64>) -> ChainSnapshot {
    debug!("current virtual_supply: {}", format_thousands(snapshot.virtual_supply));
    if let Some(supply) = supply_override {
        debug!("override virtual_supply to: {}", format_thousands(supply));
        snapshot.virtual_supply = supply;
    }
    snapshot
}

/// The two passes of an estimate: current daily emission (precise) and long-term emission (fast).
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatePlan {
    pub daily: SimulationParams,
    pub long_term: SimulationParams,
}

impl EstimatePlan {
    pub fn new(simulator: &Simulator, snapshot: &ChainSnapshot, days: i64, years: i64) -> Result<Self> {
        let schedule = simulator.schedule();
        let head = snapshot.head_block_number;

        let stop_after = |days: i64| -> Result<u64> {
            head.checked_add(schedule.blocks_for_days(days)?)
                .ok_or_else(|| InflationError::InvalidHorizon(format!("{} days past block {}", days, head)))
        };
        let long_term_days = years
            .checked_mul(DAYS_PER_LONG_TERM_YEAR)
            .ok_or_else(|| InflationError::InvalidHorizon(format!("{} years", years)))?;

        let daily = SimulationParams::new(
            head,
            stop_after(days)?,
            snapshot.virtual_supply,
            snapshot.split,
            true,
        )?;
        let long_term = SimulationParams::new(
            head,
            stop_after(long_term_days)?,
            snapshot.virtual_supply,
            snapshot.split,
            false,
        )?;

        Ok(Self { daily, long_term })
    }

    pub fn execute<S: ProgressSink + ?Sized>(
        &self,
        simulator: &Simulator,
        sink: &mut S,
    ) -> (SimulationOutcome, SimulationOutcome) {
        info!(
            "Daily emission: blocks {}..{}",
            self.daily.start_block, self.daily.stop_block
        );
        let daily = simulator.run(&self.daily, sink);

        info!(
            "Long-term emission: blocks {}..{}",
            self.long_term.start_block, self.long_term.stop_block
        );
        let long_term = simulator.run(&self.long_term, sink);

        (daily, long_term)
    }
}

pub async fn run(cli: &Cli) -> Result<()> {
    let source = data_source(cli)?;
    let snapshot = starting_state(source.chain_snapshot().await?, cli.virtual_supply);
    debug!(
        "head block {}, split worker={} witness={} vesting={}",
        snapshot.head_block_number,
        snapshot.split.worker_pct,
        snapshot.split.witness_pct,
        snapshot.split.vesting_pct
    );

    let simulator = Simulator::default();
    let plan = EstimatePlan::new(&simulator, &snapshot, cli.days, cli.years)?;
    plan.execute(&simulator, &mut StdoutProgress);
    Ok(())
}
