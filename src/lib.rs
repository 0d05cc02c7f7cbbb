//! dexscan - DexScreener Token Listing Collector
//!
//! Scrapes the DexScreener Solana listing, fills in missing mint addresses
//! and Raydium pool addresses with bounded concurrency, and stores the result.
//!
//! # Modules
//!
//! - `domain`: Token records, deduplication, address validation
//! - `ports`: Trait abstractions (PageSource, AddressLookup, PoolLookup, RecordSink)
//! - `application`: Enrichment stages and the pipeline orchestrator
//! - `adapters`: External implementations (ZenRows, DexScreener, Raydium, storage, CLI)
//! - `config`: Configuration loading and validation

pub mod domain;
pub mod ports;
pub mod application;
pub mod adapters;
pub mod config;
