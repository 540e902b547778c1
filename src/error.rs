use thiserror::Error;

#[derive(Error, Debug)]
pub enum InflationError {
    #[error("Invalid config: {0}")]
    ConfigInvalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid block range: start {start} must be below stop {stop}")]
    InvalidRange { start: u64, stop: u64 },
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(String),
    #[error("Invalid percent for {name}: {value} exceeds 10000")]
    InvalidPercent { name: &'static str, value: u32 },
    #[error("Invalid virtual supply: {0}")]
    InvalidSupply(f64),
}

pub type Result<T> = std::result::Result<T, InflationError>;
