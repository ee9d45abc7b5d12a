//! MCP server implementation.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::AppError,
    ethereum::{EthereumClient, EthereumRpc},
    services::ContractService,
    types::{ContractDescriptor, Method},
};

/// Ethereum Contract MCP Server.
///
/// Provides tools for deploying contracts and invoking their methods.
#[derive(Clone)]
pub struct ContractWorkflowServer {
    contract_service: ContractService,
    tool_router: ToolRouter<Self>,
}

impl ContractWorkflowServer {
    /// Create a new Ethereum Contract MCP Server.
    ///
    /// Note: no network calls are made during startup. The node is first
    /// contacted when a tool is invoked.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!("Initializing Ethereum Contract MCP Server");

        let client = Arc::new(EthereumClient::new(&config.rpc_url)?);
        let server = Self::with_rpc(client, &config);

        tracing::info!(
            gas_price = config.gas_price,
            poll_interval_ms = config.poll.interval.as_millis() as u64,
            poll_max_attempts = ?config.poll.max_attempts,
            compile_cache = config.compile_cache,
            compile_cache_capacity = config.compile_cache_capacity,
            "Ethereum Contract MCP Server initialized successfully"
        );

        Ok(server)
    }

    /// Create a server on top of an arbitrary RPC implementation.
    pub fn with_rpc(rpc: Arc<dyn EthereumRpc>, config: &Config) -> Self {
        Self { contract_service: ContractService::new(rpc, config), tool_router: Self::tool_router() }
    }
}

/// Input parameters for the deploy_contract tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct DeployContractInput {
    /// Solidity source of the contract.
    pub source: String,
    /// Name of the contract inside the source (e.g., "SimpleStorage").
    pub contract_key: String,
    /// Node-managed account sending the transactions (0x...).
    pub account: String,
    /// Maximum gas the account allows for each transaction.
    pub account_gas: u64,
    /// Constructor arguments, in declaration order.
    #[serde(default)]
    pub constructor_args: Option<Vec<Value>>,
    /// Method to call right after deployment.
    #[serde(default)]
    pub modify_method: Option<String>,
    /// Arguments of the post-deployment call. The call is only made when non-empty.
    /// Non-empty arguments require `modify_method`.
    #[serde(default)]
    pub modify_args: Option<Vec<Value>>,
}

/// Input parameters for the modify_contract tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct ModifyContractInput {
    /// Address of the deployed contract (0x...).
    pub contract_address: String,
    /// Solidity source of the contract.
    pub source: String,
    /// Name of the contract inside the source.
    pub contract_key: String,
    /// Node-managed account sending the transaction (0x...).
    pub account: String,
    /// Maximum gas the account allows for the transaction.
    pub account_gas: u64,
    /// State-mutating method to call.
    pub method: String,
    /// Method arguments, in declaration order.
    #[serde(default)]
    pub args: Option<Vec<Value>>,
}

/// Input parameters for the run_contract tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct RunContractInput {
    /// Address of the deployed contract (0x...).
    pub contract_address: String,
    /// Solidity source of the contract.
    pub source: String,
    /// Name of the contract inside the source.
    pub contract_key: String,
    /// Account the call is made from (0x...).
    pub account: String,
    /// Read-only method to call.
    pub method: String,
    /// Method arguments, in declaration order.
    #[serde(default)]
    pub args: Option<Vec<Value>>,
}

/// Input parameters for the get_receipt tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetReceiptInput {
    /// Hash of a previously submitted transaction (0x...).
    pub tx_hash: String,
    /// Contract address to attach to the receipt, for method calls.
    #[serde(default)]
    pub contract_address: Option<String>,
}

/// Parse and validate an Ethereum address from a string.
///
/// Validates:
/// - Address format (0x + 40 hex characters)
/// - Basic format checks
fn parse_address(s: &str) -> Result<Address, McpError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(McpError::invalid_params("Address cannot be empty", None));
    }

    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(McpError::invalid_params(format!("Address must start with '0x': {}", s), None));
    }

    // 0x + 40 hex chars = 42 total
    if trimmed.len() != 42 {
        return Err(McpError::invalid_params(
            format!(
                "Address must be 42 characters (0x + 40 hex chars), got {}: {}",
                trimmed.len(),
                s
            ),
            None,
        ));
    }

    trimmed.parse::<Address>().map_err(|e| {
        McpError::invalid_params(format!("Invalid address format '{}': {}", s, e), None)
    })
}

/// Parse a `0x` prefixed 32-byte transaction hash.
fn parse_tx_hash(s: &str) -> Result<TxHash, McpError> {
    let trimmed = s.trim();

    if !trimmed.starts_with("0x") || trimmed.len() != 66 {
        return Err(McpError::invalid_params(
            format!("Transaction hash must be 0x + 64 hex chars: {}", s),
            None,
        ));
    }

    trimmed.parse::<TxHash>().map_err(|e| {
        McpError::invalid_params(format!("Invalid transaction hash '{}': {}", s, e), None)
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[tool_router]
impl ContractWorkflowServer {
    /// Compile and deploy a contract, optionally calling a method on it afterwards.
    ///
    /// Returns the receipts keyed by step (`CREATE`, and `MODIFY` when a method was called).
    #[tool(
        description = "Compile a Solidity contract on the node and deploy it. Aborts before submission if the estimated gas exceeds account_gas. Optionally calls a state-mutating method on the new contract."
    )]
    pub async fn deploy_contract(
        &self,
        Parameters(input): Parameters<DeployContractInput>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<String, McpError> {
        self.deploy_contract_with_cancel(input, &ctx.ct).await
    }

    /// Send a state-mutating method call to a deployed contract and wait for the receipt.
    #[tool(
        description = "Call a state-mutating method of a deployed contract. Aborts before submission if the estimated gas exceeds account_gas. Returns the transaction receipt."
    )]
    pub async fn modify_contract(
        &self,
        Parameters(input): Parameters<ModifyContractInput>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<String, McpError> {
        self.modify_contract_with_cancel(input, &ctx.ct).await
    }

    /// Execute a read-only method with eth_call.
    #[tool(
        description = "Call a read-only method of a deployed contract with eth_call. No transaction is sent. Returns the first output value."
    )]
    pub async fn run_contract(
        &self,
        Parameters(input): Parameters<RunContractInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            contract = %input.contract_address,
            method = %input.method,
            "run_contract called"
        );

        let contract_address = parse_address(&input.contract_address)?;
        let account = parse_address(&input.account)?;
        let descriptor = ContractDescriptor::new(input.source, input.contract_key, account)
            .with_method(Method::run(input.method, input.args.unwrap_or_default()));

        let result = self.contract_service.run(contract_address, &descriptor).await?;
        to_json(&serde_json::json!({ "result": result }))
    }

    /// Wait for the receipt of a transaction submitted earlier.
    #[tool(
        description = "Wait for the receipt of a previously submitted transaction, e.g. after a receipt timeout."
    )]
    pub async fn get_receipt(
        &self,
        Parameters(input): Parameters<GetReceiptInput>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<String, McpError> {
        self.get_receipt_with_cancel(input, &ctx.ct).await
    }
}

/// Tool bodies that wait on receipts. The tools above pass the request's
/// cancellation token, which fires when the client cancels the call.
impl ContractWorkflowServer {
    /// Body of `deploy_contract`.
    pub async fn deploy_contract_with_cancel(
        &self,
        input: DeployContractInput,
        cancel: &CancellationToken,
    ) -> Result<String, McpError> {
        tracing::info!(
            contract = %input.contract_key,
            account = %input.account,
            account_gas = input.account_gas,
            modify = ?input.modify_method,
            "deploy_contract called"
        );

        let account = parse_address(&input.account)?;
        let mut descriptor = ContractDescriptor::new(input.source, input.contract_key, account);

        if let Some(args) = input.constructor_args {
            descriptor = descriptor.with_method(Method::create(args));
        }
        match (input.modify_method, input.modify_args) {
            (Some(name), args) => {
                descriptor = descriptor.with_method(Method::modify(name, args.unwrap_or_default()));
            }
            (None, Some(args)) if !args.is_empty() => {
                return Err(McpError::invalid_params(
                    "modify_args given without modify_method",
                    None,
                ));
            }
            (None, _) => {}
        }

        let receipts =
            self.contract_service.create_with_cancel(&descriptor, input.account_gas, cancel).await?;
        to_json(&receipts)
    }

    /// Body of `modify_contract`.
    pub async fn modify_contract_with_cancel(
        &self,
        input: ModifyContractInput,
        cancel: &CancellationToken,
    ) -> Result<String, McpError> {
        tracing::info!(
            contract = %input.contract_address,
            method = %input.method,
            account = %input.account,
            "modify_contract called"
        );

        let contract_address = parse_address(&input.contract_address)?;
        let account = parse_address(&input.account)?;
        let descriptor = ContractDescriptor::new(input.source, input.contract_key, account)
            .with_method(Method::modify(input.method, input.args.unwrap_or_default()));

        let receipt = self
            .contract_service
            .modify_with_cancel(contract_address, &descriptor, input.account_gas, cancel)
            .await?;
        to_json(&receipt)
    }

    /// Body of `get_receipt`.
    pub async fn get_receipt_with_cancel(
        &self,
        input: GetReceiptInput,
        cancel: &CancellationToken,
    ) -> Result<String, McpError> {
        tracing::info!(tx_hash = %input.tx_hash, "get_receipt called");

        let tx_hash = parse_tx_hash(&input.tx_hash)?;
        let contract_address = input.contract_address.as_deref().map(parse_address).transpose()?;

        let receipt = self.contract_service.resume(tx_hash, contract_address, cancel).await?;
        to_json(&receipt)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ContractWorkflowServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ethereum-contract-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Ethereum Contract MCP Server. Provides tools for deploying contracts, \
                 sending state-mutating calls and running read-only methods."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_parse_address_valid() {
        let addr = parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        assert_ne!(addr, Address::ZERO);
    }

    #[test]
    fn test_parse_address_rejects_bad_input() {
        let inputs = [
            "",
            "f39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "0x1234",
            "0xZZZZd6e51aad88F6F4ce6aB8827279cffFb92266",
        ];
        for input in inputs {
            let err = parse_address(input).unwrap_err();
            assert_eq!(err.code, ErrorCode::INVALID_PARAMS, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_tx_hash() {
        let hash = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";
        assert!(parse_tx_hash(hash).is_ok());
        assert!(parse_tx_hash("0x88df").is_err());
        assert!(parse_tx_hash(&hash[2..]).is_err());
    }
}
