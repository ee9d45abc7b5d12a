//! Integration tests for the compile cache.
//!
//! Run with: `cargo test --test test_compiler`

mod common;

use std::time::Duration;

use common::{test_config, MockRpc, RpcCall, SIMPLE_STORAGE};
use ethereum_contract_mcp::services::ContractCompiler;

const HOUR: Duration = Duration::from_secs(3600);

fn source(n: usize) -> String {
    format!("{SIMPLE_STORAGE}// revision {n}\n")
}

fn compiles(rpc: &MockRpc) -> usize {
    rpc.count(|c| matches!(c, RpcCall::Compile(_)))
}

/// Identical sources are compiled once while the entry is fresh.
#[tokio::test(start_paused = true)]
async fn test_cache_hit_within_ttl() {
    let rpc = MockRpc::new().into_arc();
    let compiler = ContractCompiler::with_cache(rpc.clone(), Duration::from_secs(60), 8);

    compiler.compile(SIMPLE_STORAGE).await.unwrap();
    tokio::time::advance(Duration::from_secs(30)).await;
    compiler.compile(SIMPLE_STORAGE).await.unwrap();

    assert_eq!(compiles(&rpc), 1);
    assert_eq!(compiler.cached_entries().await, 1);
}

/// An entry older than the TTL is compiled again and replaced.
#[tokio::test(start_paused = true)]
async fn test_expired_entry_is_recompiled() {
    let rpc = MockRpc::new().into_arc();
    let compiler = ContractCompiler::with_cache(rpc.clone(), Duration::from_secs(60), 8);

    compiler.compile(SIMPLE_STORAGE).await.unwrap();
    tokio::time::advance(Duration::from_secs(61)).await;
    compiler.compile(SIMPLE_STORAGE).await.unwrap();

    assert_eq!(compiles(&rpc), 2);
    assert_eq!(compiler.cached_entries().await, 1);
}

/// Expired entries are dropped when a new source is stored.
#[tokio::test(start_paused = true)]
async fn test_expired_entries_dropped_on_insert() {
    let rpc = MockRpc::new().into_arc();
    let compiler = ContractCompiler::with_cache(rpc.clone(), Duration::from_secs(60), 8);

    for n in 0..3 {
        compiler.compile(&source(n)).await.unwrap();
    }
    assert_eq!(compiler.cached_entries().await, 3);

    tokio::time::advance(Duration::from_secs(61)).await;
    compiler.compile(&source(3)).await.unwrap();

    assert_eq!(compiler.cached_entries().await, 1);
}

/// A full cache evicts its oldest entry to make room.
#[tokio::test(start_paused = true)]
async fn test_full_cache_evicts_oldest() {
    let rpc = MockRpc::new().into_arc();
    let compiler = ContractCompiler::with_cache(rpc.clone(), HOUR, 2);

    for n in 0..3 {
        compiler.compile(&source(n)).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
    }
    assert_eq!(compiler.cached_entries().await, 2);
    assert_eq!(compiles(&rpc), 3);

    // Newest two are still cached.
    compiler.compile(&source(1)).await.unwrap();
    compiler.compile(&source(2)).await.unwrap();
    assert_eq!(compiles(&rpc), 3);

    // The oldest was evicted.
    compiler.compile(&source(0)).await.unwrap();
    assert_eq!(compiles(&rpc), 4);
    assert_eq!(compiler.cached_entries().await, 2);
}

/// Many distinct sources never grow the cache past its capacity.
#[tokio::test(start_paused = true)]
async fn test_distinct_sources_stay_bounded() {
    let rpc = MockRpc::new().into_arc();
    let compiler = ContractCompiler::with_cache(rpc.clone(), HOUR, 16);

    for n in 0..500 {
        compiler.compile(&source(n)).await.unwrap();
    }

    assert_eq!(compiles(&rpc), 500);
    assert_eq!(compiler.cached_entries().await, 16);
}

/// Without a cache every call reaches the node.
#[tokio::test]
async fn test_uncached_compiler_always_compiles() {
    let rpc = MockRpc::new().into_arc();
    let compiler = ContractCompiler::new(rpc.clone());

    compiler.compile(SIMPLE_STORAGE).await.unwrap();
    compiler.compile(SIMPLE_STORAGE).await.unwrap();

    assert_eq!(compiles(&rpc), 2);
    assert_eq!(compiler.cached_entries().await, 0);
}

/// The configured capacity bounds a compiler built from configuration.
#[tokio::test]
async fn test_from_config_uses_capacity() {
    let rpc = MockRpc::new().into_arc();
    let mut config = test_config(Some(10));
    config.compile_cache_capacity = 3;
    let compiler = ContractCompiler::from_config(rpc.clone(), &config);

    for n in 0..10 {
        compiler.compile(&source(n)).await.unwrap();
    }

    assert_eq!(compiler.cached_entries().await, 3);
}

/// A zero capacity still keeps the most recent source.
#[tokio::test]
async fn test_zero_capacity_keeps_one_entry() {
    let rpc = MockRpc::new().into_arc();
    let compiler = ContractCompiler::with_cache(rpc.clone(), HOUR, 0);

    compiler.compile(SIMPLE_STORAGE).await.unwrap();
    compiler.compile(SIMPLE_STORAGE).await.unwrap();

    assert_eq!(compiles(&rpc), 1);
    assert_eq!(compiler.cached_entries().await, 1);
}
