//! Pipeline Integration Tests
//!
//! Drive the full collect -> dedup -> resolve -> persist flow with stub
//! adapters and real filesystem sinks:
//! 1. Address and pool resolution over a mixed batch
//! 2. Deduplication ahead of lookups
//! 3. Snapshot and CSV sinks fed by the pipeline
//!
//! All tests are deterministic (no real network calls).

use std::sync::Arc;
use std::time::Duration;

use dexscan::adapters::export::CsvExporter;
use dexscan::adapters::storage::SnapshotStore;
use dexscan::application::{AddressResolver, CollectConfig, Pipeline, PoolResolver, StageLimits};
use dexscan::domain::TokenRecord;
use dexscan::ports::mocks::{RecordingSink, StubLookup, StubPageSource};
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

fn fast() -> StageLimits {
    StageLimits::default().with_pacing_delay(Duration::ZERO)
}

fn no_wait(max_pages: u32) -> CollectConfig {
    CollectConfig {
        max_pages,
        page_delay: Duration::ZERO,
    }
}

/// R1 needs a mint lookup, R2 cannot be looked up, R3 is already complete
fn mixed_batch() -> Vec<TokenRecord> {
    vec![
        TokenRecord::new("ONE", "Token One").with_pair_id("p1"),
        TokenRecord::new("X", "Token X"),
        TokenRecord::new("THREE", "Token Three").with_pair_id("p3").with_address("AAA"),
    ]
}

fn address_stub() -> Arc<StubLookup> {
    Arc::new(StubLookup::new().with_response("p1", "ADDR1"))
}

fn pool_stub() -> Arc<StubLookup> {
    Arc::new(
        StubLookup::new()
            .with_response("ADDR1", "POOL1")
            .with_response("AAA", "POOLX"),
    )
}

// ============================================================================
// Resolution
// ============================================================================

#[tokio::test]
async fn test_resolvers_fill_mixed_batch() {
    let addresses = address_stub();
    let pools = pool_stub();
    let mut batch = mixed_batch();

    let report = AddressResolver::with_limits(addresses.clone(), fast())
        .resolve(&mut batch)
        .await;
    assert_eq!(report.resolved, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.already_filled, 1);

    assert_eq!(batch[0].address(), Some("ADDR1"));
    assert!(batch[1].address().is_none());
    assert_eq!(batch[2].address(), Some("AAA"));
    assert_eq!(addresses.get_calls(), vec!["p1".to_string()]);

    let report = PoolResolver::with_limits(pools.clone(), fast())
        .resolve(&mut batch)
        .await;
    assert_eq!(report.resolved, 2);
    assert_eq!(report.skipped, 1);

    assert_eq!(batch[0].pool_address(), Some("POOL1"));
    assert!(batch[1].pool_address().is_none());
    assert_eq!(batch[2].pool_address(), Some("POOLX"));

    let mut calls = pools.get_calls();
    calls.sort();
    assert_eq!(calls, vec!["AAA".to_string(), "ADDR1".to_string()]);
}

#[tokio::test]
async fn test_full_run_with_recording_sink() {
    let sink = RecordingSink::new("recording");
    let source = StubPageSource::new()
        .with_page(1, mixed_batch())
        .with_page(2, vec![TokenRecord::new("ONE", "Token One").with_pair_id("p1")]);

    let pipeline = Pipeline::new(
        source,
        AddressResolver::with_limits(address_stub(), fast()),
        PoolResolver::with_limits(pool_stub(), fast()),
        no_wait(5),
    )
    .with_sink(Box::new(sink.clone()));

    let outcome = pipeline.run().await;
    let summary = &outcome.summary;

    assert_eq!(summary.total_scraped, 4);
    assert_eq!(summary.unique, 3);
    assert_eq!(summary.missing_address_before, 2);
    assert_eq!(summary.missing_address_after, 1);
    assert_eq!(summary.pools_resolved, 2);
    assert!(summary.sinks_failed.is_empty());

    let batches = sink.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0], outcome.records);
}

#[tokio::test]
async fn test_duplicates_cost_one_lookup() {
    let addresses = Arc::new(StubLookup::new().with_response("pair-a", "MINT_A"));
    let source = StubPageSource::new().with_page(
        1,
        vec![
            TokenRecord::new("DUP", "Duplicate").with_pair_id("pair-a"),
            TokenRecord::new("DUP", "Duplicate").with_pair_id("pair-b"),
        ],
    );

    let pipeline = Pipeline::new(
        source,
        AddressResolver::with_limits(addresses.clone(), fast()),
        PoolResolver::with_limits(Arc::new(StubLookup::new()), fast()),
        no_wait(1),
    );

    let outcome = pipeline.run().await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(addresses.call_count(), 1);
    assert_eq!(outcome.records[0].address(), Some("MINT_A"));
}

// ============================================================================
// Filesystem sinks
// ============================================================================

#[tokio::test]
async fn test_run_writes_snapshot_and_csv() {
    let dir = TempDir::new().unwrap();
    let snapshots = dir.path().join("snapshots");
    let exports = dir.path().join("exports");

    let pipeline = Pipeline::new(
        StubPageSource::new().with_page(1, mixed_batch()),
        AddressResolver::with_limits(address_stub(), fast()),
        PoolResolver::with_limits(pool_stub(), fast()),
        no_wait(1),
    )
    .with_sink(Box::new(SnapshotStore::new(&snapshots)))
    .with_sink(Box::new(CsvExporter::new(&exports)));

    assert_eq!(pipeline.sink_names(), vec!["snapshot", "csv"]);

    let outcome = pipeline.run().await;
    assert!(outcome.summary.sinks_failed.is_empty());

    // Only R1 and R3 carry both a pair id and an address
    let store = SnapshotStore::new(&snapshots);
    let today = chrono::Utc::now().date_naive();
    let snapshot = store.load(today).unwrap().expect("snapshot for today");
    assert_eq!(snapshot.total_tokens, 2);
    let mut lp: Vec<&str> = snapshot.tokens.iter().map(|t| t.lp_address.as_str()).collect();
    lp.sort();
    assert_eq!(lp, vec!["POOL1", "POOLX"]);

    // The export keeps every record
    let files: Vec<_> = std::fs::read_dir(&exports).unwrap().filter_map(|e| e.ok()).collect();
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(files[0].path()).unwrap();
    assert_eq!(content.lines().count(), 4);
}

#[tokio::test]
async fn test_failing_sink_does_not_block_others() {
    let good = RecordingSink::new("good");

    let pipeline = Pipeline::new(
        StubPageSource::new().with_page(1, mixed_batch()),
        AddressResolver::with_limits(address_stub(), fast()),
        PoolResolver::with_limits(pool_stub(), fast()),
        no_wait(1),
    )
    .with_sink(Box::new(RecordingSink::failing("broken")))
    .with_sink(Box::new(good.clone()));

    let outcome = pipeline.run().await;

    assert_eq!(outcome.summary.sinks_failed, vec!["broken".to_string()]);
    assert_eq!(good.batches().len(), 1);
}
