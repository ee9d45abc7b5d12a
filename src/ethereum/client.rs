//! Ethereum RPC client.

use alloy::{
    network::Ethereum,
    primitives::{Bytes, TxHash},
    providers::{Provider, ProviderBuilder, RootProvider},
};
use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    ethereum::rpc::EthereumRpc,
    types::{CompileOutput, EthTransaction, Receipt},
};

/// Type alias for the HTTP provider.
pub type HttpProvider = RootProvider<Ethereum>;

/// Ethereum RPC client wrapper.
#[derive(Clone)]
pub struct EthereumClient {
    /// The underlying provider.
    provider: Arc<HttpProvider>,
    /// RPC URL for logging.
    rpc_url: String,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        #[allow(deprecated)]
        let provider = ProviderBuilder::new().connect_http(url).root().clone();

        tracing::info!(rpc_url = %rpc_url, "Ethereum client created (lazy initialization)");

        Ok(Self { provider: Arc::new(provider), rpc_url: rpc_url.to_string() })
    }

    /// The endpoint this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl EthereumRpc for EthereumClient {
    async fn compile_source(&self, source: &str) -> Result<CompileOutput> {
        let output: CompileOutput =
            self.provider.raw_request("eth_compileSolidity".into(), (source.to_string(),)).await?;
        tracing::debug!(contracts = output.0.len(), "Source compiled");
        Ok(output)
    }

    async fn estimate_gas(&self, tx: &EthTransaction) -> Result<u64> {
        let gas = self.provider.estimate_gas(tx.to_request()).await?;
        Ok(gas)
    }

    async fn send_transaction(&self, tx: &EthTransaction) -> Result<TxHash> {
        let pending = self.provider.send_transaction(tx.to_request()).await?;
        Ok(*pending.tx_hash())
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>> {
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;
        Ok(receipt.map(Receipt::from))
    }

    async fn call(&self, tx: &EthTransaction) -> Result<Bytes> {
        let result = self.provider.call(tx.to_request()).await?;
        Ok(result)
    }
}
