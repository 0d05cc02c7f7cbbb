//! Address Resolver
//!
//! Fills in missing mint addresses by looking each record's pair id up
//! in the DexScreener pairs API.

use async_trait::async_trait;

use crate::domain::TokenRecord;
use crate::ports::{AddressLookup, LookupError};
use super::stage::{run_stage, Enrichment, Selection, SkipReason, StageLimits, StageReport};

/// Resolves `address` from `pair_id` for every record that lacks one
pub struct AddressResolver<L> {
    lookup: L,
    limits: StageLimits,
}

impl<L: AddressLookup> AddressResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_limits(lookup, StageLimits::default())
    }

    pub fn with_limits(lookup: L, limits: StageLimits) -> Self {
        Self { lookup, limits }
    }

    pub fn limits(&self) -> StageLimits {
        self.limits
    }

    /// Resolve missing addresses in place.
    ///
    /// Records that already have an address are not looked up again, so a
    /// second pass over the same batch only retries the failures.
    pub async fn resolve(&self, batch: &mut [TokenRecord]) -> StageReport {
        run_stage(self, self.limits, batch).await
    }
}

#[async_trait]
impl<L: AddressLookup> Enrichment for AddressResolver<L> {
    fn name(&self) -> &'static str {
        "address resolution"
    }

    fn select(&self, record: &TokenRecord) -> Selection {
        if record.has_address() {
            return Selection::Filled;
        }
        match record.pair_id() {
            Some(pair_id) => Selection::Lookup(pair_id.to_string()),
            None => Selection::Skip(SkipReason::MissingPairId),
        }
    }

    async fn lookup(&self, key: &str) -> Result<String, LookupError> {
        self.lookup.lookup_address(key).await
    }

    fn apply(&self, record: &mut TokenRecord, value: String) -> bool {
        record.set_address(value);
        record.has_address()
    }
}
