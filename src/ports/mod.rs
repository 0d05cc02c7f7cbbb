//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Listing pages (scraper)
//! - Mint and pool lookups (DexScreener, Raydium)
//! - Output sinks (snapshot storage, CSV export)

pub mod lookup;
pub mod source;
pub mod sink;
pub mod mocks;

pub use lookup::{AddressLookup, LookupError, PoolLookup};
pub use source::{PageSource, ScrapeError};
pub use sink::{RecordSink, SinkError};
