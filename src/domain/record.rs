//! Token Record
//!
//! One token/pair observation scraped from the DexScreener listing.
//! Address fields start out optional and are filled in place by the
//! enrichment stages.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator used in the fallback identity key (`symbol:name`)
const KEY_SEPARATOR: char = ':';

/// A single token listing with identity, pricing and address fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// DexScreener pair identifier (from the listing row link)
    pub pair_id: Option<String>,
    /// Token mint address
    pub address: Option<String>,
    /// Liquidity pool id (Raydium)
    pub pool_address: Option<String>,
    /// Base token symbol
    pub symbol: String,
    /// Base token display name
    pub name: String,
    /// Price in USD
    pub price: f64,
    /// Market cap in USD
    pub market_cap: f64,
    /// 24-hour volume in USD
    pub volume_24h: f64,
    /// Scrape time, fixed at creation
    observed_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Create a record observed now with no addresses set
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self::observed(symbol, name, Utc::now())
    }

    /// Create a record with an explicit observation time
    pub fn observed(
        symbol: impl Into<String>,
        name: impl Into<String>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pair_id: None,
            address: None,
            pool_address: None,
            symbol: symbol.into(),
            name: name.into(),
            price: 0.0,
            market_cap: 0.0,
            volume_24h: 0.0,
            observed_at,
        }
    }

    /// Builder: set pair id (empty strings are treated as unset)
    pub fn with_pair_id(mut self, pair_id: impl Into<String>) -> Self {
        self.pair_id = present(pair_id.into());
        self
    }

    /// Builder: set mint address (empty strings are treated as unset)
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = present(address.into());
        self
    }

    /// Builder: set price, market cap and 24h volume
    pub fn with_market(mut self, price: f64, market_cap: f64, volume_24h: f64) -> Self {
        self.price = price;
        self.market_cap = market_cap;
        self.volume_24h = volume_24h;
        self
    }

    /// Pair id, if present and non-empty
    pub fn pair_id(&self) -> Option<&str> {
        non_empty(&self.pair_id)
    }

    /// Mint address, if present and non-empty
    pub fn address(&self) -> Option<&str> {
        non_empty(&self.address)
    }

    /// Pool address, if present and non-empty
    pub fn pool_address(&self) -> Option<&str> {
        non_empty(&self.pool_address)
    }

    pub fn has_address(&self) -> bool {
        self.address().is_some()
    }

    pub fn has_pool_address(&self) -> bool {
        self.pool_address().is_some()
    }

    /// Record the resolved mint address
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = present(address.into());
    }

    /// Record the resolved pool address.
    ///
    /// Ignored while the mint address is unset: a pool is only meaningful
    /// for a known token.
    pub fn set_pool_address(&mut self, pool_address: impl Into<String>) -> bool {
        if !self.has_address() {
            return false;
        }
        self.pool_address = present(pool_address.into());
        self.pool_address.is_some()
    }

    /// Time the listing was scraped
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// Deduplication key: the mint address when known, otherwise `symbol:name`
    pub fn identity_key(&self) -> String {
        match self.address() {
            Some(address) => address.to_string(),
            None => format!("{}{}{}", self.symbol, KEY_SEPARATOR, self.name),
        }
    }

    /// `symbol:name` label used in log lines
    pub fn label(&self) -> String {
        format!("{}{}{}", self.symbol, KEY_SEPARATOR, self.name)
    }
}

impl fmt::Display for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:<24} pair={} mint={} lp={} price=${} mcap=${:.0} vol24h=${:.0}",
            self.symbol,
            self.name,
            self.pair_id().unwrap_or("-"),
            self.address().unwrap_or("-"),
            self.pool_address().unwrap_or("-"),
            self.price,
            self.market_cap,
            self.volume_24h,
        )
    }
}

fn present(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
