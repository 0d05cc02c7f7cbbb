//! Bounded enrichment stage
//!
//! Shared engine behind the address and pool resolvers. Every eligible
//! record becomes one future that holds the only `&mut` to its slot in the
//! batch; a semaphore caps how many of those futures are talking to the
//! upstream API at once, and `join_all` is the barrier that keeps the stage
//! from returning before every lookup has finished.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::domain::TokenRecord;
use crate::ports::LookupError;

/// Maximum in-flight lookups per stage
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Pause after a successful lookup, before the permit is released
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(100);

/// Concurrency and pacing for one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageLimits {
    pub concurrency: usize,
    pub pacing_delay: Duration,
}

impl Default for StageLimits {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

impl StageLimits {
    pub fn new(concurrency: usize, pacing_delay: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            pacing_delay,
        }
    }

    /// Builder: override the pacing delay
    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }
}

/// Why a record was left out of a stage without a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No pair id to look the mint up by
    MissingPairId,
    /// No mint address to look a pool up by
    MissingAddress,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingPairId => write!(f, "no pair ID to fetch address"),
            SkipReason::MissingAddress => write!(f, "no address to fetch LP"),
        }
    }
}

/// What a stage should do with one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Target field already set; leave the record alone
    Filled,
    /// Cannot be resolved; warn and leave the record alone
    Skip(SkipReason),
    /// Look up using this key
    Lookup(String),
}

/// One enrichment step: which records qualify, how to look them up, and
/// where the answer goes
#[async_trait]
pub trait Enrichment: Send + Sync {
    /// Stage name for log lines
    fn name(&self) -> &'static str;

    fn select(&self, record: &TokenRecord) -> Selection;

    async fn lookup(&self, key: &str) -> Result<String, LookupError>;

    /// Store the looked-up value. Returns false if the record refused it.
    fn apply(&self, record: &mut TokenRecord, value: String) -> bool;
}

/// Per-stage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Records that already had the target field
    pub already_filled: usize,
    /// Records skipped for a missing source field
    pub skipped: usize,
    /// Lookups issued
    pub attempted: usize,
    /// Lookups that filled the target field
    pub resolved: usize,
    /// Lookups that failed (transport, decode, empty)
    pub failed: usize,
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted={} resolved={} failed={} skipped={} already_filled={}",
            self.attempted, self.resolved, self.failed, self.skipped, self.already_filled
        )
    }
}

enum Outcome {
    Resolved,
    Failed,
}

/// Run `stage` over `batch` in place
pub async fn run_stage<E>(stage: &E, limits: StageLimits, batch: &mut [TokenRecord]) -> StageReport
where
    E: Enrichment + ?Sized,
{
    let mut report = StageReport::default();
    let semaphore = Semaphore::new(limits.concurrency.max(1));

    let mut eligible = Vec::new();
    for (index, record) in batch.iter_mut().enumerate() {
        match stage.select(record) {
            Selection::Filled => report.already_filled += 1,
            Selection::Skip(reason) => {
                tracing::warn!(
                    "Warning: Token {} has {} ({})",
                    record.label(),
                    reason,
                    stage.name()
                );
                report.skipped += 1;
            }
            Selection::Lookup(key) => eligible.push((index, key, record)),
        }
    }

    report.attempted = eligible.len();
    if eligible.is_empty() {
        return report;
    }

    tracing::debug!(
        "{}: {} lookups queued (concurrency {})",
        stage.name(),
        eligible.len(),
        limits.concurrency
    );

    let semaphore = &semaphore;
    let tasks = eligible.into_iter().map(|(index, key, record)| async move {
        let Ok(_permit) = semaphore.acquire().await else {
            return Outcome::Failed;
        };

        match stage.lookup(&key).await {
            Ok(value) => {
                tracing::debug!(
                    "{}: found {} for token {} (#{})",
                    stage.name(),
                    value,
                    record.label(),
                    index
                );
                if !stage.apply(record, value) {
                    return Outcome::Failed;
                }
                tokio::time::sleep(limits.pacing_delay).await;
                Outcome::Resolved
            }
            Err(e) => {
                tracing::warn!(
                    "{}: lookup failed for {} (key {}, #{}): {}",
                    stage.name(),
                    record.label(),
                    key,
                    index,
                    e
                );
                Outcome::Failed
            }
        }
    });

    for outcome in join_all(tasks).await {
        match outcome {
            Outcome::Resolved => report.resolved += 1,
            Outcome::Failed => report.failed += 1,
        }
    }

    tracing::info!("{} complete: {}", stage.name(), report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stage that copies the symbol into the pool field
    struct EchoStage {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Enrichment for EchoStage {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn select(&self, record: &TokenRecord) -> Selection {
            if record.symbol == "SKIP" {
                Selection::Skip(SkipReason::MissingPairId)
            } else if record.has_pool_address() {
                Selection::Filled
            } else {
                Selection::Lookup(record.symbol.clone())
            }
        }

        async fn lookup(&self, key: &str) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if key == "FAIL" {
                Err(LookupError::NoResults(key.to_string()))
            } else {
                Ok(format!("pool-{}", key))
            }
        }

        fn apply(&self, record: &mut TokenRecord, value: String) -> bool {
            record.set_pool_address(value)
        }
    }

    fn with_mint(symbol: &str) -> TokenRecord {
        TokenRecord::new(symbol, "Token").with_address(format!("MINT_{}", symbol))
    }

    #[test]
    fn test_limits_default() {
        let limits = StageLimits::default();
        assert_eq!(limits.concurrency, 5);
        assert_eq!(limits.pacing_delay, Duration::from_millis(100));
        assert_eq!(StageLimits::new(0, Duration::ZERO).concurrency, 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let stage = EchoStage { calls: AtomicUsize::new(0) };
        let report = run_stage(&stage, StageLimits::default(), &mut []).await;
        assert_eq!(report, StageReport::default());
    }

    #[tokio::test]
    async fn test_report_counts_every_path() {
        let stage = EchoStage { calls: AtomicUsize::new(0) };
        let mut filled = with_mint("DONE");
        filled.set_pool_address("existing");
        let mut batch = vec![
            with_mint("A"),
            TokenRecord::new("SKIP", "Token"),
            with_mint("FAIL"),
            filled,
            with_mint("B"),
        ];

        let limits = StageLimits::default().with_pacing_delay(Duration::ZERO);
        let report = run_stage(&stage, limits, &mut batch).await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.resolved, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.already_filled, 1);
        assert_eq!(stage.calls.load(Ordering::SeqCst), 3);

        assert_eq!(batch[0].pool_address(), Some("pool-A"));
        assert_eq!(batch[2].pool_address(), None);
        assert_eq!(batch[3].pool_address(), Some("existing"));
        assert_eq!(batch[4].pool_address(), Some("pool-B"));
    }

    #[tokio::test]
    async fn test_refused_value_counts_as_failure() {
        let stage = EchoStage { calls: AtomicUsize::new(0) };
        // No mint, so set_pool_address refuses the value
        let mut batch = vec![TokenRecord::new("A", "Token")];
        let report = run_stage(&stage, StageLimits::default(), &mut batch).await;
        assert_eq!(report.failed, 1);
        assert!(batch[0].pool_address.is_none());
    }
}
