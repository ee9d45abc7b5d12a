//! JSON-RPC surface consumed by the contract workflow.

use alloy::primitives::{Bytes, TxHash};
use async_trait::async_trait;

use crate::{
    error::Result,
    types::{CompileOutput, EthTransaction, Receipt},
};

/// The node methods the workflow depends on.
///
/// Implemented by [`EthereumClient`](super::EthereumClient) for a real node and by
/// recording stubs in tests.
#[async_trait]
pub trait EthereumRpc: Send + Sync {
    /// `eth_compileSolidity`: compile contract source on the node.
    async fn compile_source(&self, source: &str) -> Result<CompileOutput>;

    /// `eth_estimateGas`: gas needed to execute `tx`.
    async fn estimate_gas(&self, tx: &EthTransaction) -> Result<u64>;

    /// `eth_sendTransaction`: submit `tx` signed by the node-managed sender account.
    async fn send_transaction(&self, tx: &EthTransaction) -> Result<TxHash>;

    /// `eth_getTransactionReceipt`: `None` while the transaction is not mined.
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>>;

    /// `eth_call`: execute `tx` against the latest state without a transaction.
    async fn call(&self, tx: &EthTransaction) -> Result<Bytes>;
}
