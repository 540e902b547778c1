// Chain data client
pub mod rpc_client;
pub mod source;
pub mod types;

pub use rpc_client::RpcClient;
pub use source::{ChainDataSource, StaticChainData};
pub use types::{Amount, ChainProperties, ChainSnapshot, DynamicGlobalProperties};
