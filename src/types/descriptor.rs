//! Contract descriptors supplied by callers of the workflow.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Classification of a contract method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Constructor invoked on deployment.
    Create,
    /// State-mutating method, sent as a transaction.
    Modify,
    /// Read-only method, executed with `eth_call`.
    Run,
}

/// An operation to invoke on a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub kind: MethodKind,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Method {
    pub fn new(name: impl Into<String>, kind: MethodKind, args: Vec<Value>) -> Self {
        Self { name: name.into(), kind, args }
    }

    pub fn create(args: Vec<Value>) -> Self {
        Self::new("constructor", MethodKind::Create, args)
    }

    pub fn modify(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::new(name, MethodKind::Modify, args)
    }

    pub fn run(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::new(name, MethodKind::Run, args)
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}

/// Source, lookup key, account and method table of a contract.
///
/// Immutable once built: every method is declared up front through
/// [`ContractDescriptor::with_method`], one per [`MethodKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDescriptor {
    source: String,
    contract_key: String,
    account: Address,
    methods: BTreeMap<MethodKind, Method>,
}

impl ContractDescriptor {
    pub fn new(source: impl Into<String>, contract_key: impl Into<String>, account: Address) -> Self {
        Self {
            source: source.into(),
            contract_key: contract_key.into(),
            account,
            methods: BTreeMap::new(),
        }
    }

    /// Return a descriptor with `method` registered under its kind, replacing any previous one.
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.insert(method.kind, method);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn contract_key(&self) -> &str {
        &self.contract_key
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.values()
    }

    /// The declared method of `kind`, if any.
    pub fn find_method(&self, kind: MethodKind) -> Option<&Method> {
        self.methods.get(&kind)
    }

    /// The declared method of `kind`, or [`AppError::NoSuchMethod`].
    pub fn method(&self, kind: MethodKind) -> Result<&Method> {
        self.find_method(kind).ok_or_else(|| {
            AppError::NoSuchMethod(format!(
                "{} declares no {:?} method",
                self.contract_key,
                kind
            ))
        })
    }
}
