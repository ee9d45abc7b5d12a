//! Receipt polling.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use tokio_util::sync::CancellationToken;

use crate::{
    config::PollConfig,
    error::{AppError, Result},
    ethereum::EthereumRpc,
    types::Receipt,
};

/// Waits for transactions to be mined by polling `eth_getTransactionReceipt`.
#[derive(Clone)]
pub struct ReceiptPoller {
    rpc: Arc<dyn EthereumRpc>,
    config: PollConfig,
}

impl ReceiptPoller {
    pub fn new(rpc: Arc<dyn EthereumRpc>, config: PollConfig) -> Self {
        Self { rpc, config }
    }

    /// Poll until the receipt of `tx_hash` is available.
    ///
    /// One query per attempt, with `interval` of sleep after every empty answer.
    /// Gives up with [`AppError::ReceiptTimeout`] once `max_attempts` empty answers were
    /// seen, and with [`AppError::Cancelled`] as soon as `cancel` fires.
    ///
    /// When `contract_address` is given the returned receipt carries it; otherwise the
    /// node's contract address is kept as is.
    pub async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        contract_address: Option<Address>,
        cancel: &CancellationToken,
    ) -> Result<Receipt> {
        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(AppError::Cancelled { tx_hash });
            }

            if let Some(receipt) = self.rpc.get_transaction_receipt(tx_hash).await? {
                tracing::debug!(tx_hash = %tx_hash, attempts = attempts + 1, "Receipt received");
                return Ok(match contract_address {
                    Some(address) => receipt.with_contract_address(address),
                    None => receipt,
                });
            }

            attempts += 1;
            if self.config.max_attempts.is_some_and(|max| attempts >= max) {
                tracing::warn!(tx_hash = %tx_hash, attempts, "Gave up waiting for receipt");
                return Err(AppError::ReceiptTimeout { tx_hash, attempts });
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::warn!(tx_hash = %tx_hash, attempts, "Receipt wait cancelled");
                    return Err(AppError::Cancelled { tx_hash });
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }
}
