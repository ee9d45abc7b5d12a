//! Transaction receipt types.

use alloy::{
    network::ReceiptResponse,
    primitives::{Address, Bytes, TxHash, B256},
    rpc::types::TransactionReceipt,
};
use serde::{Deserialize, Serialize};

/// Which workflow step produced a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptKind {
    /// Contract creation.
    Create,
    /// State-mutating method call.
    Modify,
}

/// Log emitted by a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Confirmation record of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    /// `true` when execution succeeded.
    pub status: bool,
    /// Created contract for creation receipts, or the caller-supplied target for calls.
    pub contract_address: Option<Address>,
    pub logs: Vec<ReceiptLog>,
}

impl Receipt {
    /// Minimal receipt for a transaction hash; every other field empty.
    pub fn new(transaction_hash: TxHash) -> Self {
        Self {
            transaction_hash,
            block_hash: None,
            block_number: None,
            from: Address::ZERO,
            to: None,
            gas_used: 0,
            effective_gas_price: 0,
            status: true,
            contract_address: None,
            logs: Vec::new(),
        }
    }

    /// Copy of this receipt carrying `address` as contract address.
    pub fn with_contract_address(self, address: Address) -> Self {
        Self { contract_address: Some(address), ..self }
    }
}

impl From<TransactionReceipt> for Receipt {
    fn from(receipt: TransactionReceipt) -> Self {
        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| ReceiptLog {
                address: log.inner.address,
                topics: log.inner.data.topics().to_vec(),
                data: log.inner.data.data.clone(),
            })
            .collect();

        Self {
            transaction_hash: receipt.transaction_hash(),
            block_hash: receipt.block_hash(),
            block_number: receipt.block_number(),
            from: receipt.from(),
            to: receipt.to(),
            gas_used: receipt.gas_used(),
            effective_gas_price: receipt.effective_gas_price(),
            status: receipt.status(),
            contract_address: receipt.contract_address(),
            logs,
        }
    }
}
