//! Pool Resolver
//!
//! Finds the most liquid Raydium pool for each token that has a mint
//! address. Mirror of the address resolver with a different source field,
//! target field and lookup.

use async_trait::async_trait;

use crate::domain::TokenRecord;
use crate::ports::{LookupError, PoolLookup};
use super::stage::{run_stage, Enrichment, Selection, SkipReason, StageLimits, StageReport};

/// Resolves `pool_address` from `address`
pub struct PoolResolver<L> {
    lookup: L,
    limits: StageLimits,
}

impl<L: PoolLookup> PoolResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_limits(lookup, StageLimits::default())
    }

    pub fn with_limits(lookup: L, limits: StageLimits) -> Self {
        Self { lookup, limits }
    }

    pub fn limits(&self) -> StageLimits {
        self.limits
    }

    /// Resolve pool addresses in place. Records without a mint are skipped.
    pub async fn resolve(&self, batch: &mut [TokenRecord]) -> StageReport {
        run_stage(self, self.limits, batch).await
    }
}

#[async_trait]
impl<L: PoolLookup> Enrichment for PoolResolver<L> {
    fn name(&self) -> &'static str {
        "LP resolution"
    }

    fn select(&self, record: &TokenRecord) -> Selection {
        match record.address() {
            None => Selection::Skip(SkipReason::MissingAddress),
            Some(_) if record.has_pool_address() => Selection::Filled,
            Some(address) => Selection::Lookup(address.to_string()),
        }
    }

    async fn lookup(&self, key: &str) -> Result<String, LookupError> {
        self.lookup.lookup_pool(key).await
    }

    fn apply(&self, record: &mut TokenRecord, value: String) -> bool {
        record.set_pool_address(value)
    }
}
