//! Business logic services module.

pub mod compiler;
pub mod contract;
pub mod gas;
pub mod receipt;
pub mod submitter;

pub use compiler::ContractCompiler;
pub use contract::{ContractService, DeployReceipts};
pub use gas::GasGuard;
pub use receipt::ReceiptPoller;
pub use submitter::TransactionSubmitter;
