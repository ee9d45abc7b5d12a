//! Ethereum interaction module.
//!
//! Contains the RPC surface, the alloy-backed client and ABI helpers.

pub mod abi;
pub mod client;
pub mod rpc;

pub use client::{EthereumClient, HttpProvider};
pub use rpc::EthereumRpc;
