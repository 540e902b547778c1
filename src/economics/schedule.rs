use crate::error::{InflationError, Result};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Fixed emission schedule of the chain.
///
/// The inflation rate starts at `start_rate` (ten-thousandths, 1515 = 15.15%)
/// and narrows by one unit every `narrowing_period` blocks until it reaches
/// `floor_rate`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionSchedule {
    pub start_rate: f64,
    pub floor_rate: f64,
    pub narrowing_period: u64,
    pub block_interval_secs: u64,
    pub percent_100: f64,
    pub max_witnesses: u64,
    pub timeshare_weight: f64,
    pub top19_weight: f64,
    pub witness_pay_normalization_factor: f64,
}

impl Default for EmissionSchedule {
    fn default() -> Self {
        Self {
            start_rate: 1515.0,
            floor_rate: 95.0,
            narrowing_period: 250_000,
            block_interval_secs: 3,
            percent_100: 10_000.0,
            max_witnesses: 21,
            timeshare_weight: 5.0,
            top19_weight: 1.0,
            witness_pay_normalization_factor: 25.0,
        }
    }
}

impl EmissionSchedule {
    /// Quotient of seconds, not rounded. With a 3s interval this is 10_512_000.0.
    pub fn blocks_per_year(&self) -> f64 {
        SECONDS_PER_YEAR as f64 / self.block_interval_secs as f64
    }

    pub fn blocks_per_day(&self) -> f64 {
        SECONDS_PER_DAY as f64 / self.block_interval_secs as f64
    }

    /// Linear, not stepped: block 125_000 yields 0.5.
    pub fn rate_adjustment(&self, block: u64) -> f64 {
        block as f64 / self.narrowing_period as f64
    }

    pub fn rate_for_adjustment(&self, adjustment: f64) -> f64 {
        (self.start_rate - adjustment).max(self.floor_rate)
    }

    /// Inflation rate in effect at `block`, clamped to the floor.
    pub fn inflation_rate(&self, block: u64) -> f64 {
        self.rate_for_adjustment(self.rate_adjustment(block))
    }

    /// Supply minted by a single block at the given rate.
    pub fn block_emission(&self, virtual_supply: f64, rate: f64) -> f64 {
        virtual_supply * rate / (self.percent_100 * self.blocks_per_year())
    }

    /// Every `max_witnesses`-th block of absolute height goes to the time-share slot.
    pub fn is_timeshare_block(&self, block: u64) -> bool {
        block % self.max_witnesses == 0
    }

    /// Floating-point modulo against `blocks_per_year`. Fires at block 0 and
    /// only where the float remainder is exactly zero.
    pub fn is_year_boundary(&self, block: u64) -> bool {
        (block as f64) % self.blocks_per_year() == 0.0
    }

    pub fn years_elapsed(&self, block: u64) -> f64 {
        block as f64 / self.blocks_per_year()
    }

    /// Number of blocks produced in `days` calendar days. Negative or
    /// out-of-range day counts are rejected.
    pub fn blocks_for_days(&self, days: i64) -> Result<u64> {
        let seconds = chrono::TimeDelta::try_days(days)
            .map(|d| d.num_seconds())
            .filter(|s| *s >= 0)
            .ok_or_else(|| InflationError::InvalidHorizon(format!("{} days", days)))?;
        Ok(seconds as u64 / self.block_interval_secs)
    }

    /// Block height at which the rate first reaches the floor.
    pub fn floor_block(&self) -> u64 {
        ((self.start_rate - self.floor_rate) * self.narrowing_period as f64) as u64
    }
}
