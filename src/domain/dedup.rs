//! Listing deduplication
//!
//! The same token shows up more than once when listings span several
//! pages (and DexScreener shifts rows between page loads). Collapse the
//! raw scrape to one record per identity key.

use std::collections::HashSet;

use super::record::TokenRecord;

/// Keep the first record seen for each identity key, in input order
pub fn dedup_records(records: Vec<TokenRecord>) -> Vec<TokenRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect()
}
