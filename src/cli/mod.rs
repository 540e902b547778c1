pub mod estimate;

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "golos-inflation")]
#[command(about = "Estimate future token inflation", long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Path to the config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override current virtual_supply
    #[arg(long)]
    pub virtual_supply: Option<f64>,

    /// Horizon of the precise pass, in days
    #[arg(long, default_value_t = 1)]
    pub days: i64,

    /// Horizon of the long-term pass, in 364-day years
    #[arg(long, default_value_t = 50)]
    pub years: i64,

    /// Don't contact a node; take chain state from the flags below
    #[arg(
        long,
        requires_all = ["head_block", "virtual_supply", "worker_pct", "witness_pct", "vesting_pct"]
    )]
    pub offline: bool,

    #[arg(long)]
    pub head_block: Option<u64>,
    #[arg(long)]
    pub worker_pct: Option<u16>,
    #[arg(long)]
    pub witness_pct: Option<u16>,
    #[arg(long)]
    pub vesting_pct: Option<u16>,
}
