use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::economics::RewardSplit;
use crate::error::InflationError;

/// Asset amount as the node renders it, e.g. `"123456.789 GOLOS"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    pub amount: f64,
    pub symbol: String,
}

impl FromStr for Amount {
    type Err = InflationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(value), Some(symbol), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(InflationError::InvalidAmount(s.to_string()));
        };
        let amount: f64 = value
            .parse()
            .map_err(|_| InflationError::InvalidAmount(s.to_string()))?;
        if !amount.is_finite() {
            return Err(InflationError::InvalidAmount(s.to_string()));
        }
        Ok(Self {
            amount,
            symbol: symbol.to_string(),
        })
    }
}

impl TryFrom<String> for Amount {
    type Error = InflationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(a: Amount) -> Self {
        a.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} {}", self.amount, self.symbol)
    }
}

/// Subset of `get_dynamic_global_properties` we need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u64,
    pub virtual_supply: Amount,
}

/// Median chain properties voted by witnesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProperties {
    pub worker_reward_percent: u16,
    pub witness_reward_percent: u16,
    pub vesting_reward_percent: u16,
}

impl ChainProperties {
    pub fn reward_split(&self) -> RewardSplit {
        RewardSplit::new(
            self.worker_reward_percent,
            self.witness_reward_percent,
            self.vesting_reward_percent,
        )
    }
}

/// Everything a run needs from the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSnapshot {
    pub head_block_number: u64,
    pub virtual_supply: f64,
    pub split: RewardSplit,
}
