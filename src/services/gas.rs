//! Gas estimation and allowance enforcement.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::{
    error::{AppError, Result},
    ethereum::EthereumRpc,
    types::EthTransaction,
};

/// Estimates gas for prepared transactions and rejects those above the caller's allowance.
#[derive(Clone)]
pub struct GasGuard {
    rpc: Arc<dyn EthereumRpc>,
}

impl GasGuard {
    pub fn new(rpc: Arc<dyn EthereumRpc>) -> Self {
        Self { rpc }
    }

    /// Estimate gas for `tx` and check it against `account_gas`.
    ///
    /// Returns the estimate unchanged so it can be attached to the transaction.
    /// A single `eth_estimateGas` round trip, never retried.
    pub async fn estimate(&self, tx: &EthTransaction, account_gas: u64) -> Result<u64> {
        let estimated = self.rpc.estimate_gas(tx).await?;
        tracing::debug!(account = %tx.from(), estimated, limit = account_gas, "Gas estimated");
        check_gas(tx.from(), account_gas, estimated)?;
        Ok(estimated)
    }
}

/// Fail with [`AppError::GasExceeded`] when `estimated` is above `account_gas`.
pub fn check_gas(account: Address, account_gas: u64, estimated: u64) -> Result<()> {
    if estimated > account_gas {
        tracing::warn!(account = %account, estimated, limit = account_gas, "Gas allowance exceeded");
        return Err(AppError::GasExceeded { account, estimated, limit: account_gas });
    }
    Ok(())
}
