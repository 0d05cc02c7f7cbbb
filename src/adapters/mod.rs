//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - ZenRows: listing page scraper (`PageSource`)
//! - DexScreener: pair to mint lookup (`AddressLookup`)
//! - Raydium: mint to pool lookup (`PoolLookup`)
//! - Storage: daily JSON snapshots (`RecordSink`)
//! - Export: CSV files (`RecordSink`)
//! - CLI: Command-line interface definitions

pub mod zenrows;
pub mod dexscreener;
pub mod raydium;
pub mod storage;
pub mod export;
pub mod cli;

#[cfg(test)]
pub(crate) mod test_server;

pub use zenrows::ZenRowsScraper;
pub use dexscreener::DexScreenerClient;
pub use raydium::RaydiumClient;
pub use storage::SnapshotStore;
pub use export::CsvExporter;
pub use cli::CliApp;
