//! Error types and handling module.
//!
//! Defines all application-specific error types and conversions.

use alloy::primitives::{Address, TxHash};
use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ethereum RPC errors.
    #[error("Ethereum RPC error: {0}")]
    Rpc(String),

    /// Transport errors.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid Ethereum address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Estimated gas is above the caller's allowance. Nothing was submitted.
    #[error("Gas exceeded for account {account}: estimated {estimated}, limit {limit}")]
    GasExceeded { account: Address, estimated: u64, limit: u64 },

    /// Requested contract method is not declared or not present in the ABI.
    #[error("No such contract method: {0}")]
    NoSuchMethod(String),

    /// Contract key missing from the compiler output.
    #[error("Contract not found in compiler output: {0}")]
    ContractNotFound(String),

    /// ABI encoding or decoding failure.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Receipt did not show up within the configured number of polls.
    #[error("Timed out waiting for receipt of {tx_hash} after {attempts} attempts")]
    ReceiptTimeout { tx_hash: TxHash, attempts: u32 },

    /// Receipt wait was cancelled by the caller.
    #[error("Receipt wait for {tx_hash} was cancelled")]
    Cancelled { tx_hash: TxHash },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        AppError::Rpc(err.to_string())
    }
}

impl From<alloy::dyn_abi::Error> for AppError {
    fn from(err: alloy::dyn_abi::Error) -> Self {
        AppError::Abi(err.to_string())
    }
}

impl From<alloy::hex::FromHexError> for AppError {
    fn from(err: alloy::hex::FromHexError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidAddress(_)
            | AppError::Parse(_)
            | AppError::Abi(_)
            | AppError::NoSuchMethod(_)
            | AppError::ContractNotFound(_)
            | AppError::GasExceeded { .. } => McpError::invalid_params(err.to_string(), None),
            AppError::Config(_) => McpError::invalid_request(err.to_string(), None),
            _ => McpError::internal_error(err.to_string(), None),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
