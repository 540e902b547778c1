use tracing::debug;

use super::report::{self, StdoutProgress};
use super::schedule::EmissionSchedule;
use crate::error::{InflationError, Result};

/// Median reward split, each on the 0..=10000 scale. Whatever the three
/// leave over goes to content rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardSplit {
    pub worker_pct: u16,
    pub witness_pct: u16,
    pub vesting_pct: u16,
}

impl RewardSplit {
    pub fn new(worker_pct: u16, witness_pct: u16, vesting_pct: u16) -> Self {
        Self {
            worker_pct,
            witness_pct,
            vesting_pct,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("worker_pct", self.worker_pct),
            ("witness_pct", self.witness_pct),
            ("vesting_pct", self.vesting_pct),
        ] {
            if value > 10_000 {
                return Err(InflationError::InvalidPercent {
                    name,
                    value: value as u32,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub start_block: u64,
    pub stop_block: u64,
    pub virtual_supply: f64,
    pub split: RewardSplit,
    pub precise: bool,
}

impl SimulationParams {
    pub fn new(
        start_block: u64,
        stop_block: u64,
        virtual_supply: f64,
        split: RewardSplit,
        precise: bool,
    ) -> Result<Self> {
        if start_block >= stop_block {
            return Err(InflationError::InvalidRange {
                start: start_block,
                stop: stop_block,
            });
        }
        if !virtual_supply.is_finite() || virtual_supply <= 0.0 {
            return Err(InflationError::InvalidSupply(virtual_supply));
        }
        split.validate()?;

        Ok(Self {
            start_block,
            stop_block,
            virtual_supply,
            split,
            precise,
        })
    }
}

/// Per-block breakdown of a precise pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRewards {
    pub worker: f64,
    pub content: f64,
    pub vesting: f64,
    /// Witness share before rotation weighting.
    pub witness_share: f64,
    /// Witness pay after scaling by the witness count and the slot weight.
    pub witness: f64,
    pub timeshare: bool,
}

impl BlockRewards {
    /// Supply actually minted by the block. Worker rewards are not part of it.
    pub fn minted(&self) -> f64 {
        self.content + self.vesting + self.witness
    }
}

/// Running totals of a precise pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RewardTotals {
    pub worker: f64,
    pub content: f64,
    pub vesting: f64,
    pub witness: f64,
    pub top19: f64,
    pub timeshare: f64,
}

impl RewardTotals {
    pub fn record(&mut self, rewards: &BlockRewards) {
        if rewards.timeshare {
            self.timeshare += rewards.witness;
        } else {
            self.top19 += rewards.witness;
        }
        self.worker += rewards.worker;
        self.content += rewards.content;
        self.vesting += rewards.vesting;
        self.witness += rewards.witness;
    }

    /// Content + vesting + witness. The worker total is reported but left out.
    pub fn new_supply(&self) -> f64 {
        self.content + self.vesting + self.witness
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearlyProgress {
    pub block: u64,
    pub years: f64,
    pub daily_new_supply: f64,
    /// Ten-thousandths.
    pub rate: f64,
    pub virtual_supply: f64,
}

/// Receives a progress record each time the simulation crosses a year boundary.
pub trait ProgressSink {
    fn on_year(&mut self, progress: &YearlyProgress);
}

impl ProgressSink for Vec<YearlyProgress> {
    fn on_year(&mut self, progress: &YearlyProgress) {
        self.push(*progress);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub final_block: u64,
    pub virtual_supply: f64,
    pub last_rate_adjustment: f64,
    pub last_rate: f64,
    pub totals: Option<RewardTotals>,
}

impl SimulationOutcome {
    pub fn total_reward(&self) -> Option<f64> {
        self.totals.as_ref().map(RewardTotals::new_supply)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Simulator {
    schedule: EmissionSchedule,
}

impl Simulator {
    pub fn new(schedule: EmissionSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &EmissionSchedule {
        &self.schedule
    }

    /// Splits one block's emission between the funds and applies the witness rotation.
    pub fn split_block_reward(&self, block: u64, new_supply: f64, split: &RewardSplit) -> BlockRewards {
        let s = &self.schedule;
        let worker = new_supply * split.worker_pct as f64 / s.percent_100;
        let witness_share = new_supply * split.witness_pct as f64 / s.percent_100;
        let vesting = new_supply * split.vesting_pct as f64 / s.percent_100;
        let content = new_supply - worker - witness_share - vesting;

        let timeshare = s.is_timeshare_block(block);
        let weight = if timeshare {
            s.timeshare_weight
        } else {
            s.top19_weight
        };
        let witness = witness_share * s.max_witnesses as f64 * weight / s.witness_pay_normalization_factor;

        BlockRewards {
            worker,
            content,
            vesting,
            witness_share,
            witness,
            timeshare,
        }
    }

    /// Runs the schedule block by block over `[start_block, stop_block)`.
    pub fn run<S: ProgressSink + ?Sized>(&self, params: &SimulationParams, sink: &mut S) -> SimulationOutcome {
        let s = &self.schedule;
        let blocks_per_day = s.blocks_per_day();

        let mut block = params.start_block;
        let mut virtual_supply = params.virtual_supply;
        let mut totals = params.precise.then(RewardTotals::default);
        let mut rate_adjustment = s.rate_adjustment(block);
        let mut rate = s.rate_for_adjustment(rate_adjustment);

        while block < params.stop_block {
            rate_adjustment = s.rate_adjustment(block);
            rate = s.rate_for_adjustment(rate_adjustment);
            let mut new_supply = s.block_emission(virtual_supply, rate);

            if let Some(totals) = totals.as_mut() {
                let rewards = self.split_block_reward(block, new_supply, &params.split);
                totals.record(&rewards);
                new_supply = rewards.minted();
            }

            virtual_supply += new_supply;

            if s.is_year_boundary(block) {
                sink.on_year(&YearlyProgress {
                    block,
                    years: s.years_elapsed(block),
                    daily_new_supply: new_supply * blocks_per_day,
                    rate,
                    virtual_supply,
                });
            }

            block += 1;
        }

        debug!(
            "last inflation_rate_adjustment: {}",
            report::format_percent(rate_adjustment / s.percent_100)
        );
        debug!(
            "last current_inflation_rate: {}",
            report::format_percent(rate / s.percent_100)
        );
        if let Some(totals) = &totals {
            report::log_totals(totals);
        }

        SimulationOutcome {
            final_block: block,
            virtual_supply,
            last_rate_adjustment: rate_adjustment,
            last_rate: rate,
            totals,
        }
    }
}

/// Simulates `[start_block, stop_block)` with the default schedule, printing
/// yearly progress to stdout. Returns the period's new supply in precise mode.
pub fn simulate(
    start_block: u64,
    stop_block: u64,
    virtual_supply: f64,
    worker_pct: u16,
    witness_pct: u16,
    vesting_pct: u16,
    precise: bool,
) -> Result<Option<f64>> {
    let split = RewardSplit::new(worker_pct, witness_pct, vesting_pct);
    let params = SimulationParams::new(start_block, stop_block, virtual_supply, split, precise)?;
    let outcome = Simulator::default().run(&params, &mut StdoutProgress);
    Ok(outcome.total_reward())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const BLOCKS_PER_YEAR: f64 = 10_512_000.0;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn params(start: u64, stop: u64, split: RewardSplit, precise: bool) -> SimulationParams {
        SimulationParams::new(start, stop, 1_000_000_000.0, split, precise).unwrap()
    }

    #[test]
    fn test_params_validation() {
        let split = RewardSplit::default();
        assert!(matches!(
            SimulationParams::new(10, 10, 1.0, split, false),
            Err(InflationError::InvalidRange { start: 10, stop: 10 })
        ));
        assert!(matches!(
            SimulationParams::new(0, 10, 0.0, split, false),
            Err(InflationError::InvalidSupply(_))
        ));
        assert!(matches!(
            SimulationParams::new(0, 10, f64::NAN, split, false),
            Err(InflationError::InvalidSupply(_))
        ));
        assert!(matches!(
            SimulationParams::new(0, 10, 1.0, RewardSplit::new(0, 10_001, 0), false),
            Err(InflationError::InvalidPercent { name: "witness_pct", value: 10_001 })
        ));
        // sum above 100% is accepted as is
        assert!(SimulationParams::new(0, 10, 1.0, RewardSplit::new(5_000, 5_000, 5_000), true).is_ok());
    }

    #[test]
    fn test_single_block_precise_scenario() {
        let split = RewardSplit::new(0, 1000, 2667);
        let mut years: Vec<YearlyProgress> = Vec::new();
        let outcome = Simulator::default().run(&params(0, 1, split, true), &mut years);

        let new_supply = 1_000_000_000.0 * 1515.0 / (10_000.0 * BLOCKS_PER_YEAR);
        let witness_share = new_supply * 1000.0 / 10_000.0;
        let vesting = new_supply * 2667.0 / 10_000.0;
        let content = new_supply - 0.0 - witness_share - vesting;
        let witness = witness_share * 21.0 * 5.0 / 25.0;

        assert_eq!(outcome.last_rate, 1515.0);
        assert_eq!(outcome.final_block, 1);
        let totals = outcome.totals.unwrap();
        assert_eq!(totals.worker, 0.0);
        assert!(close(totals.content, content));
        assert!(close(totals.vesting, vesting));
        assert!(close(totals.witness, witness));
        assert!(close(totals.timeshare, witness));
        assert_eq!(totals.top19, 0.0);
        assert!(close(outcome.total_reward().unwrap(), content + vesting + witness));
        assert!(close(outcome.virtual_supply, 1_000_000_000.0 + content + vesting + witness));

        // block 0 is a year boundary
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].block, 0);
        assert_eq!(years[0].years, 0.0);
        assert!(close(years[0].daily_new_supply, (content + vesting + witness) * 28_800.0));
    }

    #[test]
    fn test_content_is_residual_before_rotation() {
        let simulator = Simulator::default();
        let split = RewardSplit::new(1000, 1500, 2667);
        for block in [0u64, 1, 20, 21, 22, 4_200_000] {
            let rewards = simulator.split_block_reward(block, 123.456, &split);
            assert!(close(
                rewards.content,
                123.456 - rewards.worker - rewards.witness_share - rewards.vesting
            ));
        }
    }

    #[test]
    fn test_witness_rotation_weights() {
        let simulator = Simulator::default();
        let split = RewardSplit::new(0, 1000, 0);

        let timeshare = simulator.split_block_reward(42, 100.0, &split);
        assert!(timeshare.timeshare);
        assert!(close(timeshare.witness, 10.0 * 21.0 * 5.0 / 25.0));

        let top19 = simulator.split_block_reward(43, 100.0, &split);
        assert!(!top19.timeshare);
        assert!(close(top19.witness, 10.0 * 21.0 / 25.0));
    }

    #[test]
    fn test_rotation_phase_follows_absolute_height() {
        // starting at 20: block 21 is the only time-share block in the range
        let split = RewardSplit::new(0, 1000, 0);
        let outcome = Simulator::default().run(&params(20, 23, split, true), &mut Vec::<YearlyProgress>::new());
        let totals = outcome.totals.unwrap();
        assert!(totals.timeshare > 0.0);
        assert!(totals.top19 > 0.0);
        assert!(close(totals.witness, totals.timeshare + totals.top19));
        assert!(totals.timeshare > totals.top19);
    }

    #[test]
    fn test_total_reward_excludes_worker() {
        let split = RewardSplit::new(1000, 1000, 2667);
        let outcome = Simulator::default().run(&params(100, 28_900, split, true), &mut Vec::<YearlyProgress>::new());
        let totals = outcome.totals.unwrap();
        assert!(totals.worker > 0.0);
        assert_eq!(outcome.total_reward().unwrap(), totals.content + totals.vesting + totals.witness);
        assert!(outcome.total_reward().unwrap() < totals.content + totals.vesting + totals.witness + totals.worker);
    }

    #[test]
    fn test_rate_reaches_1514_after_narrowing_period() {
        let outcome = Simulator::default().run(&params(0, 250_001, RewardSplit::default(), false), &mut Vec::<YearlyProgress>::new());
        assert_eq!(outcome.last_rate_adjustment, 1.0);
        assert_eq!(outcome.last_rate, 1514.0);
    }

    #[test]
    fn test_rate_clamped_on_long_horizon() {
        let outcome = Simulator::default().run(
            &params(355_000_000, 355_000_010, RewardSplit::default(), false),
            &mut Vec::<YearlyProgress>::new(),
        );
        assert_eq!(outcome.last_rate, 95.0);
    }

    #[test]
    fn test_fast_mode_returns_nothing() {
        let mut years: Vec<YearlyProgress> = Vec::new();
        let outcome = Simulator::default().run(&params(1, 1_000, RewardSplit::new(0, 1000, 2667), false), &mut years);
        assert!(outcome.totals.is_none());
        assert!(outcome.total_reward().is_none());
        assert!(years.is_empty());
    }

    #[test]
    #[traced_test]
    fn test_precise_run_logs_per_category_totals() {
        let split = RewardSplit::new(1000, 1000, 2667);
        Simulator::default().run(&params(0, 50, split, true), &mut Vec::<YearlyProgress>::new());

        for line in [
            "worker_reward_per_period",
            "content_reward_per_period",
            "vesting_reward_per_period",
            "witness_reward_per_period",
            "new_supply_per_period",
            "timeshare witness reward per period",
            "top19 witness reward per period",
            "last inflation_rate_adjustment: 0.00%",
            "last current_inflation_rate: 15.15%",
        ] {
            assert!(logs_contain(line), "missing log line: {}", line);
        }
    }

    #[test]
    #[traced_test]
    fn test_fast_run_logs_no_per_category_totals() {
        let split = RewardSplit::new(1000, 1000, 2667);
        Simulator::default().run(&params(0, 50, split, false), &mut Vec::<YearlyProgress>::new());

        assert!(logs_contain("last current_inflation_rate"));
        assert!(!logs_contain("_per_period"));
        assert!(!logs_contain("witness reward per period"));
    }

    #[test]
    fn test_fast_mode_supply_compounds() {
        let schedule = EmissionSchedule::default();
        let mut expected = 1_000_000_000.0;
        for block in 5..8 {
            expected += schedule.block_emission(expected, schedule.inflation_rate(block));
        }
        let outcome = Simulator::default().run(&params(5, 8, RewardSplit::default(), false), &mut Vec::<YearlyProgress>::new());
        assert_eq!(outcome.virtual_supply, expected);
    }

    #[test]
    fn test_supply_never_decreases() {
        let simulator = Simulator::default();
        let mut supply = 1_000_000_000.0;
        let mut start = 0;
        for _ in 0..20 {
            let p = SimulationParams::new(start, start + 500, supply, RewardSplit::new(1000, 1000, 2667), true).unwrap();
            let outcome = simulator.run(&p, &mut Vec::<YearlyProgress>::new());
            assert!(outcome.virtual_supply >= supply);
            supply = outcome.virtual_supply;
            start = outcome.final_block;
        }
    }

    #[test]
    fn test_yearly_progress_each_year() {
        let mut years: Vec<YearlyProgress> = Vec::new();
        let stop = 2 * 10_512_000 + 1;
        let outcome = Simulator::default().run(&params(1, stop, RewardSplit::default(), false), &mut years);
        assert_eq!(outcome.final_block, stop);
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].block, 10_512_000);
        assert_eq!(years[0].years, 1.0);
        assert_eq!(years[1].block, 21_024_000);
        assert_eq!(years[1].years, 2.0);
        assert!(years[1].rate < years[0].rate);
        assert!(years[1].virtual_supply > years[0].virtual_supply);
    }

    #[test]
    fn test_simulate_contract() {
        let total = simulate(0, 1, 1_000_000_000.0, 0, 1000, 2667, true).unwrap();
        assert!(total.unwrap() > 0.0);
        assert_eq!(simulate(1, 2, 1_000_000_000.0, 0, 1000, 2667, false).unwrap(), None);
        assert!(simulate(2, 1, 1_000_000_000.0, 0, 0, 0, false).is_err());
    }
}
