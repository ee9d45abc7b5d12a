//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod compile;
pub mod descriptor;
pub mod receipt;
pub mod transaction;

pub use compile::*;
pub use descriptor::*;
pub use receipt::*;
pub use transaction::*;
