//! DexScreener Adapter
//!
//! Pairs API client used to recover a token's mint address when the
//! listing row did not expose it.
//!
//! # Example
//!
//! ```rust,ignore
//! use dexscan::adapters::dexscreener::DexScreenerClient;
//!
//! let client = DexScreenerClient::new()?;
//! let mint = client.fetch_token_address("8sLbNZoA1cfnvMJLPfp98ZLAnFSYCFApfJKMbiXNLwxj").await?;
//! ```

mod client;
mod types;

pub use client::{DexScreenerClient, DexScreenerConfig};
pub use types::{PairEntry, PairsResponse, TokenRef};
