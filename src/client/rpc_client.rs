// JSON-RPC client for Golos API nodes
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::source::ChainDataSource;
use super::types::{ChainProperties, ChainSnapshot, DynamicGlobalProperties};
use crate::config::NodeConfig;
use crate::error::{InflationError, Result};

const DATABASE_API: &str = "database_api";

pub struct RpcClient {
    urls: Vec<String>,
    client: Client,
    request_id: AtomicU64,
}

impl RpcClient {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            client: Client::new(),
            request_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &NodeConfig) -> Result<Self> {
        if config.urls.is_empty() {
            return Err(InflationError::ConfigInvalid("node.urls is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InflationError::ConfigInvalid(format!("HTTP client: {}", e)))?;

        Ok(Self {
            urls: config.urls.clone(),
            client,
            request_id: AtomicU64::new(1),
        })
    }

    // Tries every node in order; the first one that answers decides the result.
    async fn call<T: DeserializeOwned>(&self, api: &str, method: &str, params: Value) -> Result<T> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": [api, method, params],
            "id": id,
        });

        let mut failures = Vec::new();
        for url in &self.urls {
            debug!("RPC {}.{} -> {}", api, method, url);
            let response = match self.client.post(url).json(&request).send().await {
                Ok(r) => r,
                Err(e) => {
                    warn!("RPC request to {} failed: {}", url, e);
                    failures.push(format!("{}: {}", url, e));
                    continue;
                }
            };
            if !response.status().is_success() {
                warn!("RPC node {} returned {}", url, response.status());
                failures.push(format!("{}: HTTP {}", url, response.status()));
                continue;
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| InflationError::InvalidResponse(format!("{} from {}: {}", method, url, e)))?;
            return parse_result(method, body);
        }

        Err(InflationError::DataSourceUnavailable(failures.join("; ")))
    }

    pub async fn get_dynamic_global_properties(&self) -> Result<DynamicGlobalProperties> {
        self.call(DATABASE_API, "get_dynamic_global_properties", json!([]))
            .await
    }

    pub async fn get_chain_properties(&self) -> Result<ChainProperties> {
        self.call(DATABASE_API, "get_chain_properties", json!([])).await
    }
}

fn parse_result<T: DeserializeOwned>(method: &str, body: Value) -> Result<T> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        return Err(InflationError::Rpc {
            code: error["code"].as_i64().unwrap_or(0),
            message: error["message"].as_str().unwrap_or("Unknown error").to_string(),
        });
    }
    let result = body
        .get("result")
        .cloned()
        .ok_or_else(|| InflationError::InvalidResponse(format!("{}: no 'result' field", method)))?;
    serde_json::from_value(result).map_err(|e| InflationError::InvalidResponse(format!("{}: {}", method, e)))
}

#[async_trait]
impl ChainDataSource for RpcClient {
    async fn chain_snapshot(&self) -> Result<ChainSnapshot> {
        let props = self.get_dynamic_global_properties().await?;
        let median = self.get_chain_properties().await?;
        Ok(ChainSnapshot {
            head_block_number: props.head_block_number,
            virtual_supply: props.virtual_supply.amount,
            split: median.reward_split(),
        })
    }
}
