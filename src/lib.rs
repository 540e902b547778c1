pub mod cli;
pub mod client;
pub mod config;
pub mod economics;
pub mod error;

pub use economics::simulate;
pub use error::InflationError;
