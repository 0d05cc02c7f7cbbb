//! ZenRows Adapter
//!
//! Listing scraper for DexScreener pages rendered through the ZenRows proxy:
//! - `ZenRowsScraper`: page fetching (implements `PageSource`)
//! - `listing`: HTML row extraction and figure parsing

mod client;
pub mod listing;

pub use client::{ListingFilters, ZenRowsConfig, ZenRowsScraper};
pub use listing::{parse_listing, parse_numeric, ListingSelectors};
