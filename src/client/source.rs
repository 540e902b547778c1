use async_trait::async_trait;

use super::types::ChainSnapshot;
use crate::error::Result;

/// Where the starting chain state comes from.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    async fn chain_snapshot(&self) -> Result<ChainSnapshot>;
}

/// Fixed snapshot, used when running without a node.
#[derive(Debug, Clone, Copy)]
pub struct StaticChainData(pub ChainSnapshot);

#[async_trait]
impl ChainDataSource for StaticChainData {
    async fn chain_snapshot(&self) -> Result<ChainSnapshot> {
        Ok(self.0)
    }
}
