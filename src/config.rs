use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{InflationError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "./common.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InflationConfig {
    pub node: NodeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NodeConfig {
    /// API endpoints, tried in order. A single string is accepted too.
    #[serde(deserialize_with = "one_or_many")]
    pub urls: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(url) => vec![url],
        OneOrMany::Many(urls) => urls,
    })
}

impl InflationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| InflationError::ConfigInvalid(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&s)
            .map_err(|e| InflationError::ConfigInvalid(format!("{}: {}", path.display(), e)))?;

        if config.node.urls.is_empty() {
            return Err(InflationError::ConfigInvalid(format!(
                "{}: node.urls must list at least one endpoint",
                path.display()
            )));
        }
        Ok(config)
    }
}
