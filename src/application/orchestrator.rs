//! Pipeline Orchestrator
//!
//! Runs one collection cycle: scrape listing pages, deduplicate, resolve
//! mint addresses, resolve LP addresses, then hand the batch to the sinks.
//! Stages run strictly one after another; each consumes the previous
//! stage's full output.

use std::fmt;
use std::time::Duration;

use crate::domain::{dedup_records, TokenRecord};
use crate::ports::{AddressLookup, PageSource, PoolLookup, RecordSink};
use super::address_resolver::AddressResolver;
use super::pool_resolver::PoolResolver;
use super::stage::StageReport;

/// Default number of listing pages to scrape
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Default pause between listing pages
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Collect,
    Deduplicate,
    ResolveAddress,
    ResolvePool,
    Persist,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Collect => "collect",
            PipelineStage::Deduplicate => "deduplicate",
            PipelineStage::ResolveAddress => "resolve-address",
            PipelineStage::ResolvePool => "resolve-pool",
            PipelineStage::Persist => "persist",
        };
        write!(f, "{}", name)
    }
}

/// Page collection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectConfig {
    /// Last page to request (pages are 1-based)
    pub max_pages: u32,
    /// Pause between consecutive pages
    pub page_delay: Duration,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_scraped: usize,
    pub unique: usize,
    pub missing_address_before: usize,
    pub missing_address_after: usize,
    pub pools_resolved: usize,
    /// Names of sinks that failed to accept the batch
    pub sinks_failed: Vec<String>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scraped={} unique={} missing_address_before={} missing_address_after={} pools_resolved={}",
            self.total_scraped,
            self.unique,
            self.missing_address_before,
            self.missing_address_after,
            self.pools_resolved
        )?;
        if !self.sinks_failed.is_empty() {
            write!(f, " sinks_failed=[{}]", self.sinks_failed.join(", "))?;
        }
        Ok(())
    }
}

/// Result of enriching a batch (stages 2-4)
#[derive(Debug, Clone)]
pub struct EnrichOutcome {
    pub records: Vec<TokenRecord>,
    pub summary: RunSummary,
    pub address_report: Option<StageReport>,
    pub pool_report: StageReport,
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub records: Vec<TokenRecord>,
    pub summary: RunSummary,
}

/// Sequences collect -> deduplicate -> resolve address -> resolve pool -> sinks
pub struct Pipeline<S, A, P> {
    source: S,
    address_resolver: AddressResolver<A>,
    pool_resolver: PoolResolver<P>,
    sinks: Vec<Box<dyn RecordSink>>,
    collect: CollectConfig,
}

impl<S, A, P> Pipeline<S, A, P>
where
    S: PageSource,
    A: AddressLookup,
    P: PoolLookup,
{
    pub fn new(
        source: S,
        address_resolver: AddressResolver<A>,
        pool_resolver: PoolResolver<P>,
        collect: CollectConfig,
    ) -> Self {
        Self {
            source,
            address_resolver,
            pool_resolver,
            sinks: Vec::new(),
            collect,
        }
    }

    /// Builder: add an output sink (run in the order added)
    pub fn with_sink(mut self, sink: Box<dyn RecordSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Run a full cycle
    pub async fn run(&self) -> PipelineOutcome {
        let raw = self.collect().await;
        let enriched = self.enrich(raw).await;

        let mut summary = enriched.summary;
        let records = enriched.records;
        summary.sinks_failed = self.persist(&records).await;

        tracing::info!("Run complete: {}", summary);
        PipelineOutcome { records, summary }
    }

    /// Stage 1: scrape pages until one is empty, fails, or `max_pages` is reached
    pub async fn collect(&self) -> Vec<TokenRecord> {
        tracing::info!("Stage: {}", PipelineStage::Collect);
        let mut all = Vec::new();

        for page in 1..=self.collect.max_pages {
            tracing::info!("Scraping page {}...", page);
            let records = match self.source.scrape_page(page).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!("Error scraping page {}: {}", page, e);
                    break;
                }
            };

            if records.is_empty() {
                tracing::info!("No tokens found on page {}, stopping", page);
                break;
            }

            tracing::info!("Found {} tokens on page {}", records.len(), page);
            all.extend(records);

            if page < self.collect.max_pages && !self.collect.page_delay.is_zero() {
                tokio::time::sleep(self.collect.page_delay).await;
            }
        }

        all
    }

    /// Stages 2-4 over an already collected batch
    pub async fn enrich(&self, raw: Vec<TokenRecord>) -> EnrichOutcome {
        let mut summary = RunSummary {
            total_scraped: raw.len(),
            ..Default::default()
        };

        tracing::info!("Stage: {}", PipelineStage::Deduplicate);
        tracing::info!("Total tokens before deduplication: {}", raw.len());
        let mut records = dedup_records(raw);
        summary.unique = records.len();
        tracing::info!("Unique tokens after deduplication: {}", records.len());

        summary.missing_address_before = count_missing_address(&records);
        tracing::info!("Tokens without address: {}", summary.missing_address_before);

        let address_report = if summary.missing_address_before > 0 {
            tracing::info!("Stage: {}", PipelineStage::ResolveAddress);
            Some(self.address_resolver.resolve(&mut records).await)
        } else {
            None
        };
        summary.missing_address_after = count_missing_address(&records);

        tracing::info!("Stage: {}", PipelineStage::ResolvePool);
        let pool_report = self.pool_resolver.resolve(&mut records).await;
        summary.pools_resolved = pool_report.resolved;

        EnrichOutcome {
            records,
            summary,
            address_report,
            pool_report,
        }
    }

    /// Stage 5: hand the batch to every sink; failures are logged, not retried
    pub async fn persist(&self, records: &[TokenRecord]) -> Vec<String> {
        tracing::info!("Stage: {}", PipelineStage::Persist);
        let mut failed = Vec::new();

        for sink in &self.sinks {
            match sink.accept(records).await {
                Ok(written) => tracing::info!("{}: wrote {} tokens", sink.name(), written),
                Err(e) => {
                    tracing::error!("{}: error saving tokens: {}", sink.name(), e);
                    failed.push(sink.name().to_string());
                }
            }
        }

        failed
    }
}

fn count_missing_address(records: &[TokenRecord]) -> usize {
    records.iter().filter(|r| !r.has_address()).count()
}
