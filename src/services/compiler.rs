//! Contract compilation through the node, with an optional source-keyed cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{keccak256, B256};
use tokio::{sync::RwLock, time::Instant};

use crate::{
    config::Config,
    error::Result,
    ethereum::EthereumRpc,
    types::{CompileOutput, CompiledContract},
};

/// A compiler output and the moment it was stored.
struct CacheEntry {
    output: CompileOutput,
    inserted: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted.elapsed() > ttl
    }
}

/// Compiler outputs keyed by source hash, bounded in age and in size.
struct CacheState {
    entries: HashMap<B256, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl CacheState {
    fn new(ttl: Duration, capacity: usize) -> Self {
        Self { entries: HashMap::new(), ttl, capacity: capacity.max(1) }
    }

    fn get(&self, key: &B256) -> Option<&CompileOutput> {
        self.entries.get(key).filter(|entry| !entry.is_expired(self.ttl)).map(|entry| &entry.output)
    }

    /// Store `output`, dropping expired entries and then the oldest ones while full.
    fn insert(&mut self, key: B256, output: CompileOutput) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));

        while self.entries.len() >= self.capacity {
            let Some(oldest) =
                self.entries.iter().min_by_key(|(_, entry)| entry.inserted).map(|(key, _)| *key)
            else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::debug!(source_hash = %oldest, "Compile cache entry evicted");
        }

        self.entries.insert(key, CacheEntry { output, inserted: Instant::now() });
    }
}

/// Compiles contract sources via `eth_compileSolidity`.
///
/// With caching enabled, outputs are keyed by the keccak256 hash of the source text
/// so identical sources are compiled once until their entry expires or is evicted.
#[derive(Clone)]
pub struct ContractCompiler {
    rpc: Arc<dyn EthereumRpc>,
    cache: Option<Arc<RwLock<CacheState>>>,
}

impl ContractCompiler {
    /// Create a compiler that asks the node on every call.
    pub fn new(rpc: Arc<dyn EthereumRpc>) -> Self {
        Self { rpc, cache: None }
    }

    /// Create a compiler keeping at most `capacity` outputs, each for at most `ttl`.
    pub fn with_cache(rpc: Arc<dyn EthereumRpc>, ttl: Duration, capacity: usize) -> Self {
        Self { rpc, cache: Some(Arc::new(RwLock::new(CacheState::new(ttl, capacity)))) }
    }

    /// Create a compiler following the `COMPILE_CACHE*` settings.
    pub fn from_config(rpc: Arc<dyn EthereumRpc>, config: &Config) -> Self {
        if config.compile_cache {
            Self::with_cache(rpc, config.compile_cache_ttl, config.compile_cache_capacity)
        } else {
            Self::new(rpc)
        }
    }

    /// Compile `source`, or return the cached output for the same text.
    pub async fn compile(&self, source: &str) -> Result<CompileOutput> {
        let Some(cache) = &self.cache else {
            return self.rpc.compile_source(source).await;
        };

        let key = keccak256(source.as_bytes());
        if let Some(output) = cache.read().await.get(&key) {
            tracing::debug!(source_hash = %key, "Compile cache hit");
            return Ok(output.clone());
        }

        let output = self.rpc.compile_source(source).await?;
        cache.write().await.insert(key, output.clone());
        Ok(output)
    }

    /// Compile `source` and pick the contract named `contract_key`.
    pub async fn compile_contract(&self, source: &str, contract_key: &str) -> Result<CompiledContract> {
        let output = self.compile(source).await?;
        let contract = output.contract(contract_key)?.clone();
        tracing::debug!(
            contract = %contract_key,
            functions = contract.abi().functions().count(),
            "Contract compiled"
        );
        Ok(contract)
    }

    /// Number of stored outputs, expired ones included until the next insert.
    /// Always 0 with caching disabled.
    pub async fn cached_entries(&self) -> usize {
        match &self.cache {
            Some(cache) => cache.read().await.entries.len(),
            None => 0,
        }
    }
}
