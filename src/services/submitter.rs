//! Transaction submission.

use std::sync::Arc;

use alloy::primitives::TxHash;

use crate::{error::Result, ethereum::EthereumRpc, types::EthTransaction};

/// Attaches gas and gas price to prepared transactions and sends them.
#[derive(Clone)]
pub struct TransactionSubmitter {
    rpc: Arc<dyn EthereumRpc>,
    gas_price: u128,
}

impl TransactionSubmitter {
    pub fn new(rpc: Arc<dyn EthereumRpc>, gas_price: u128) -> Self {
        Self { rpc, gas_price }
    }

    /// Gas price attached to every submission, in wei.
    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    /// Send `tx` with exactly `gas` as gas limit and the configured gas price.
    ///
    /// No retry: a transport failure here leaves the submission state unknown.
    pub async fn submit(&self, tx: &EthTransaction, gas: u64) -> Result<TxHash> {
        let tx = tx.to_builder().gas(gas).gas_price(self.gas_price).build();
        let tx_hash = self.rpc.send_transaction(&tx).await?;

        tracing::info!(
            tx_hash = %tx_hash,
            from = %tx.from(),
            to = ?tx.to(),
            gas,
            gas_price = self.gas_price,
            "Transaction submitted"
        );

        Ok(tx_hash)
    }
}
