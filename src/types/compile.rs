//! Compiler output types (`eth_compileSolidity` response).

use std::collections::HashMap;

use alloy::{
    hex,
    json_abi::{Function, JsonAbi},
    primitives::Bytes,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Compiler output keyed by contract name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompileOutput(pub HashMap<String, CompiledContract>);

impl CompileOutput {
    /// Look up a contract by its key.
    pub fn contract(&self, key: &str) -> Result<&CompiledContract> {
        self.0.get(key).ok_or_else(|| AppError::ContractNotFound(key.to_string()))
    }
}

/// A single compiled contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledContract {
    /// Hex encoded creation bytecode, `0x` prefixed.
    pub code: String,
    /// Compiler metadata including the ABI.
    pub info: ContractMetadata,
}

/// Metadata attached to a compiled contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub language_version: Option<String>,
    #[serde(default)]
    pub compiler_version: Option<String>,
    /// Method table of the contract.
    #[serde(default)]
    pub abi_definition: JsonAbi,
}

impl CompiledContract {
    /// Creation bytecode with the two-character `0x` prefix removed.
    pub fn bytecode(&self) -> Result<Bytes> {
        let code = self.code.get(2..).unwrap_or_default();
        if code.is_empty() {
            return Err(AppError::Parse("Compiled contract has no bytecode".into()));
        }
        Ok(hex::decode(code)?.into())
    }

    /// The contract ABI.
    pub fn abi(&self) -> &JsonAbi {
        &self.info.abi_definition
    }

    /// Resolve a function by name, first overload wins.
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.abi()
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| AppError::NoSuchMethod(name.to_string()))
    }
}
