//! Common utilities for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{address, b256, Address, Bytes, TxHash, U256},
};
use async_trait::async_trait;
use ethereum_contract_mcp::{
    config::PollConfig,
    types::{CompileOutput, EthTransaction, Receipt},
    AppError, Config, EthereumRpc, Result,
};

pub const ACCOUNT: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const CONTRACT: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
pub const OTHER_CONTRACT: Address = address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512");
pub const TX_HASH: TxHash =
    b256!("88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b");
pub const GAS_PRICE: u128 = 1_000_000_000;

pub const SIMPLE_STORAGE: &str = r#"
pragma solidity ^0.4.24;
contract SimpleStorage {
    uint256 value;
    constructor(uint256 initial) public { value = initial; }
    function set(uint256 x) public { value = x; }
    function get() public view returns (uint256) { return value; }
}
"#;

const COMPILE_RESPONSE: &str = r#"{
    "SimpleStorage": {
        "code": "0x6080604052348015600f57600080fd5b50",
        "info": {
            "language": "Solidity",
            "abiDefinition": [
                {
                    "type": "constructor",
                    "inputs": [{ "name": "initial", "type": "uint256" }],
                    "stateMutability": "nonpayable"
                },
                {
                    "type": "function",
                    "name": "set",
                    "inputs": [{ "name": "x", "type": "uint256" }],
                    "outputs": [],
                    "stateMutability": "nonpayable"
                },
                {
                    "type": "function",
                    "name": "get",
                    "inputs": [],
                    "outputs": [{ "name": "", "type": "uint256" }],
                    "stateMutability": "view"
                }
            ]
        }
    }
}"#;

/// Compiler output for [`SIMPLE_STORAGE`].
pub fn compile_output() -> CompileOutput {
    serde_json::from_str(COMPILE_RESPONSE).expect("valid compile response")
}

/// Configuration with a short poll interval and the given attempt bound.
pub fn test_config(max_attempts: Option<u32>) -> Config {
    let mut config = Config::new("http://127.0.0.1:8545");
    config.gas_price = GAS_PRICE;
    config.poll = PollConfig { interval: Duration::from_millis(500), max_attempts };
    config
}

/// A mined receipt, optionally carrying a node-assigned contract address.
pub fn mined_receipt(tx_hash: TxHash, contract_address: Option<Address>) -> Receipt {
    let mut receipt = Receipt::new(tx_hash);
    receipt.block_number = Some(1);
    receipt.from = ACCOUNT;
    receipt.gas_used = 21_000;
    receipt.contract_address = contract_address;
    receipt
}

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcCall {
    Compile(String),
    EstimateGas(EthTransaction),
    Send(EthTransaction),
    GetReceipt(TxHash),
    Call(EthTransaction),
}

/// Scripted [`EthereumRpc`] that records every call.
///
/// `eth_call` answers with a single encoded `uint256` zero unless told otherwise.
pub struct MockRpc {
    pub compile: CompileOutput,
    pub estimated_gas: u64,
    pub call_output: Bytes,
    pub fail_send: bool,
    tx_hashes: Mutex<VecDeque<TxHash>>,
    receipts: Mutex<VecDeque<Option<Receipt>>>,
    calls: Mutex<Vec<RpcCall>>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            compile: compile_output(),
            estimated_gas: 50_000,
            call_output: DynSolValue::Uint(U256::ZERO, 256).abi_encode().into(),
            fail_send: false,
            tx_hashes: Mutex::new(VecDeque::new()),
            receipts: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_estimated_gas(mut self, gas: u64) -> Self {
        self.estimated_gas = gas;
        self
    }

    pub fn with_call_output(mut self, output: impl Into<Bytes>) -> Self {
        self.call_output = output.into();
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    /// Hashes returned by successive sends; `TX_HASH` once exhausted.
    pub fn with_tx_hashes(self, hashes: impl IntoIterator<Item = TxHash>) -> Self {
        self.tx_hashes.lock().unwrap().extend(hashes);
        self
    }

    /// Answers returned by successive receipt queries; `None` once exhausted.
    pub fn with_receipts(self, receipts: impl IntoIterator<Item = Option<Receipt>>) -> Self {
        self.receipts.lock().unwrap().extend(receipts);
        self
    }

    /// `empty` not-yet-mined answers followed by `receipt`.
    pub fn with_receipt_after(self, empty: usize, receipt: Receipt) -> Self {
        self.with_receipts(std::iter::repeat(None).take(empty).chain(std::iter::once(Some(receipt))))
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&RpcCall) -> bool) -> usize {
        self.calls().iter().filter(|call| pred(call)).count()
    }

    pub fn sent(&self) -> Vec<EthTransaction> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RpcCall::Send(tx) => Some(tx),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RpcCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EthereumRpc for MockRpc {
    async fn compile_source(&self, source: &str) -> Result<CompileOutput> {
        self.record(RpcCall::Compile(source.to_string()));
        Ok(self.compile.clone())
    }

    async fn estimate_gas(&self, tx: &EthTransaction) -> Result<u64> {
        self.record(RpcCall::EstimateGas(tx.clone()));
        Ok(self.estimated_gas)
    }

    async fn send_transaction(&self, tx: &EthTransaction) -> Result<TxHash> {
        self.record(RpcCall::Send(tx.clone()));
        if self.fail_send {
            return Err(AppError::Transport("connection reset".into()));
        }
        Ok(self.tx_hashes.lock().unwrap().pop_front().unwrap_or(TX_HASH))
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>> {
        self.record(RpcCall::GetReceipt(tx_hash));
        Ok(self.receipts.lock().unwrap().pop_front().flatten())
    }

    async fn call(&self, tx: &EthTransaction) -> Result<Bytes> {
        self.record(RpcCall::Call(tx.clone()));
        Ok(self.call_output.clone())
    }
}

/// Helper to create a client-backed service from environment variables.
pub fn create_node_service() -> Option<ethereum_contract_mcp::ContractService> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let rpc_url = std::env::var("ETHEREUM_RPC_URL").ok()?;
    if rpc_url.is_empty() {
        return None;
    }

    let config = Config::new(rpc_url);
    let client = ethereum_contract_mcp::EthereumClient::new(&config.rpc_url).ok()?;
    Some(ethereum_contract_mcp::ContractService::new(Arc::new(client), &config))
}

/// Skip test if no node is configured (missing env vars).
#[macro_export]
macro_rules! skip_if_no_node {
    () => {
        match common::create_node_service() {
            Some(service) => service,
            None => {
                eprintln!("Skipping test: ETHEREUM_RPC_URL not set");
                return;
            }
        }
    };
}
