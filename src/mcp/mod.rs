//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::ContractWorkflowServer;
pub use server::{DeployContractInput, GetReceiptInput, ModifyContractInput, RunContractInput};
