//! Ethereum Contract MCP Server Library
//!
//! A Model Context Protocol server that compiles, deploys and invokes Ethereum
//! smart contracts through a node's JSON-RPC interface.
//!
//! # Features
//!
//! - **Deploy**: compile on the node, check gas, submit and wait for the receipt
//! - **Modify**: send a state-mutating method call to a deployed contract
//! - **Run**: execute a read-only method with `eth_call`
//!
//! Every submission is preceded by a gas estimate checked against the caller's
//! allowance, and receipt polling is bounded and cancellable.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ethereum_contract_mcp::{Config, ContractService, EthereumClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = Arc::new(EthereumClient::new(&config.rpc_url)?);
//!     let service = ContractService::new(client, &config);
//!     // service.create(&descriptor, 3_000_000).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod mcp;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::{EthereumClient, EthereumRpc};
pub use mcp::ContractWorkflowServer;
pub use services::ContractService;
