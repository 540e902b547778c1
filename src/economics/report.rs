use tracing::{debug, info};

use super::simulator::{ProgressSink, RewardTotals, YearlyProgress};

/// Prints one line per year boundary to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn on_year(&mut self, progress: &YearlyProgress) {
        println!("{}", progress_line(progress));
    }
}

pub fn progress_line(p: &YearlyProgress) -> String {
    format!(
        "new_supply daily on block {} ({:.0} years): {:.0}. Rate: {}. Virtual Supply: {}",
        p.block,
        p.years,
        p.daily_new_supply,
        format_percent(p.rate / 10_000.0),
        format_thousands(p.virtual_supply)
    )
}

/// `0.1515` -> `"15.15%"`
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Rounds to an integer and groups digits by three: `1234567.8` -> `"1,234,568"`.
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        // inf / NaN
        return rounded;
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

pub fn log_totals(totals: &RewardTotals) {
    info!("worker_reward_per_period: {:.0}", totals.worker);
    info!("content_reward_per_period: {:.0}", totals.content);
    info!("vesting_reward_per_period: {:.0}", totals.vesting);
    info!("witness_reward_per_period: {:.0}", totals.witness);
    debug!("timeshare witness reward per period: {:.0}", totals.timeshare);
    debug!("top19 witness reward per period: {:.0}", totals.top19);
    info!("new_supply_per_period: {:.0}", totals.new_supply());
}
