//! Raydium Adapter
//!
//! Pool info API client used to attach an LP address to each resolved token.

mod client;
mod types;

pub use client::{RaydiumClient, RaydiumConfig, WSOL_MINT};
pub use types::{PoolEntry, PoolPage, PoolsResponse};
