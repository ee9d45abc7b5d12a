//! Contract workflow: deploy, modify and run.

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::{AppError, Result},
    ethereum::{abi, EthereumRpc},
    services::{ContractCompiler, GasGuard, ReceiptPoller, TransactionSubmitter},
    types::{ContractDescriptor, EthTransaction, MethodKind, Receipt, ReceiptKind},
};

/// Receipts produced by a deployment, keyed by workflow step.
pub type DeployReceipts = BTreeMap<ReceiptKind, Receipt>;

/// Sequences compile, gas check, submission and receipt polling for contract operations.
///
/// Holds no state between calls apart from the optional compile cache.
#[derive(Clone)]
pub struct ContractService {
    rpc: Arc<dyn EthereumRpc>,
    compiler: ContractCompiler,
    gas_guard: GasGuard,
    submitter: TransactionSubmitter,
    poller: ReceiptPoller,
}

impl ContractService {
    /// Create a contract service on top of `rpc`.
    pub fn new(rpc: Arc<dyn EthereumRpc>, config: &Config) -> Self {
        Self {
            compiler: ContractCompiler::from_config(rpc.clone(), config),
            gas_guard: GasGuard::new(rpc.clone()),
            submitter: TransactionSubmitter::new(rpc.clone(), config.gas_price),
            poller: ReceiptPoller::new(rpc.clone(), config.poll),
            rpc,
        }
    }

    /// Deploy the descriptor's contract, then call its modify method if it has arguments.
    pub async fn create(
        &self,
        descriptor: &ContractDescriptor,
        account_gas: u64,
    ) -> Result<DeployReceipts> {
        self.create_with_cancel(descriptor, account_gas, &CancellationToken::new()).await
    }

    /// [`ContractService::create`] with a caller-controlled cancellation token.
    pub async fn create_with_cancel(
        &self,
        descriptor: &ContractDescriptor,
        account_gas: u64,
        cancel: &CancellationToken,
    ) -> Result<DeployReceipts> {
        tracing::info!(
            contract = %descriptor.contract_key(),
            account = %descriptor.account(),
            "Deploying contract"
        );

        let contract =
            self.compiler.compile_contract(descriptor.source(), descriptor.contract_key()).await?;
        let mut code = contract.bytecode()?.to_vec();

        if let Some(method) = descriptor.find_method(MethodKind::Create).filter(|m| m.has_args()) {
            let constructor = contract.abi().constructor().ok_or_else(|| {
                AppError::NoSuchMethod(format!(
                    "{} has no constructor taking arguments",
                    descriptor.contract_key()
                ))
            })?;
            code.extend_from_slice(&abi::encode_constructor_args(constructor, &method.args)?);
        }

        let tx = EthTransaction::builder(descriptor.account()).data(code).build();
        let tx_hash = self.send(&tx, account_gas).await?;
        let receipt = self.poller.wait_for_receipt(tx_hash, None, cancel).await?;
        tracing::debug!(receipt = ?receipt, "Created contract");

        let contract_address = receipt.contract_address;
        let mut receipts = DeployReceipts::new();
        receipts.insert(ReceiptKind::Create, receipt);

        if descriptor.find_method(MethodKind::Modify).is_some_and(|m| m.has_args()) {
            let address = contract_address.ok_or_else(|| {
                AppError::Rpc(format!("Creation receipt of {} has no contract address", tx_hash))
            })?;
            let modify = self.modify_with_cancel(address, descriptor, account_gas, cancel).await?;
            tracing::debug!(receipt = ?modify, "Updated contract");
            receipts.insert(ReceiptKind::Modify, modify);
        }

        Ok(receipts)
    }

    /// Send the descriptor's modify method to the contract at `contract_address`.
    pub async fn modify(
        &self,
        contract_address: Address,
        descriptor: &ContractDescriptor,
        account_gas: u64,
    ) -> Result<Receipt> {
        self.modify_with_cancel(contract_address, descriptor, account_gas, &CancellationToken::new())
            .await
    }

    /// [`ContractService::modify`] with a caller-controlled cancellation token.
    pub async fn modify_with_cancel(
        &self,
        contract_address: Address,
        descriptor: &ContractDescriptor,
        account_gas: u64,
        cancel: &CancellationToken,
    ) -> Result<Receipt> {
        let method = descriptor.method(MethodKind::Modify)?;
        tracing::info!(
            contract = %contract_address,
            method = %method.name,
            account = %descriptor.account(),
            "Modifying contract"
        );

        let contract =
            self.compiler.compile_contract(descriptor.source(), descriptor.contract_key()).await?;
        let function = contract.function(&method.name)?;
        let data = abi::encode_function_call(function, &method.args)?;

        let tx = EthTransaction::builder(descriptor.account())
            .to(contract_address)
            .data(data)
            .gas_price(self.submitter.gas_price())
            .build();
        let tx_hash = self.send(&tx, account_gas).await?;

        self.poller.wait_for_receipt(tx_hash, Some(contract_address), cancel).await
    }

    /// Execute the descriptor's read-only method and return its first output.
    ///
    /// A single `eth_call`: no gas check, no transaction, no receipt.
    pub async fn run(
        &self,
        contract_address: Address,
        descriptor: &ContractDescriptor,
    ) -> Result<Value> {
        let method = descriptor.method(MethodKind::Run)?;
        tracing::info!(contract = %contract_address, method = %method.name, "Running contract method");

        let contract =
            self.compiler.compile_contract(descriptor.source(), descriptor.contract_key()).await?;
        let function = contract.function(&method.name)?;
        let data = abi::encode_function_call(function, &method.args)?;

        let tx =
            EthTransaction::builder(descriptor.account()).to(contract_address).data(data).build();
        let output = self.rpc.call(&tx).await?;

        abi::decode_first_output(function, &output)
    }

    /// Resume waiting for a transaction submitted earlier.
    pub async fn resume(
        &self,
        tx_hash: TxHash,
        contract_address: Option<Address>,
        cancel: &CancellationToken,
    ) -> Result<Receipt> {
        tracing::info!(tx_hash = %tx_hash, "Resuming receipt wait");
        self.poller.wait_for_receipt(tx_hash, contract_address, cancel).await
    }

    async fn send(&self, tx: &EthTransaction, account_gas: u64) -> Result<TxHash> {
        let gas = self.gas_guard.estimate(tx, account_gas).await?;
        self.submitter.submit(tx, gas).await
    }
}
