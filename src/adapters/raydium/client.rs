//! Raydium Pool Client
//!
//! Finds the most liquid pool pairing a mint with wrapped SOL via the
//! Raydium v3 `pools/info/mint` endpoint.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::ports::{LookupError, PoolLookup};
use super::types::PoolsResponse;

/// Wrapped SOL mint
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Configuration for the RaydiumClient
#[derive(Debug, Clone)]
pub struct RaydiumConfig {
    /// API base, without trailing slash
    pub api_url: String,
    /// Quote side of the pool (native asset)
    pub quote_mint: String,
    /// Pools per page requested from the API
    pub page_size: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RaydiumConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api-v3.raydium.io".to_string(),
            quote_mint: WSOL_MINT.to_string(),
            page_size: 1000,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for Raydium's pool info API
#[derive(Debug, Clone)]
pub struct RaydiumClient {
    config: RaydiumConfig,
    http: Client,
}

impl RaydiumClient {
    /// Create a new RaydiumClient with default configuration
    pub fn new() -> Result<Self, LookupError> {
        Self::with_config(RaydiumConfig::default())
    }

    /// Create a new RaydiumClient with custom configuration
    pub fn with_config(config: RaydiumConfig) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, http })
    }

    fn pools_url(&self) -> String {
        format!("{}/pools/info/mint", self.config.api_url.trim_end_matches('/'))
    }

    /// Query parameters: pools of `mint` against the quote mint, deepest first
    fn query(&self, mint: &str) -> Vec<(&'static str, String)> {
        vec![
            ("mint1", mint.to_string()),
            ("mint2", self.config.quote_mint.clone()),
            ("poolType", "all".to_string()),
            ("poolSortField", "liquidity".to_string()),
            ("sortType", "desc".to_string()),
            ("pageSize", self.config.page_size.to_string()),
            ("page", "1".to_string()),
        ]
    }

    /// Fetch the id of the most liquid pool for `mint`
    pub async fn fetch_lp_address(&self, mint: &str) -> Result<String, LookupError> {
        let response = self
            .http
            .get(self.pools_url())
            .query(&self.query(mint))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::BadStatus(status));
        }

        let body = response.text().await?;
        let parsed: PoolsResponse = serde_json::from_str(&body)?;
        top_pool(mint, parsed)
    }

    pub fn config(&self) -> &RaydiumConfig {
        &self.config
    }
}

#[async_trait]
impl PoolLookup for RaydiumClient {
    async fn lookup_pool(&self, mint: &str) -> Result<String, LookupError> {
        self.fetch_lp_address(mint).await
    }
}

/// First pool of the liquidity-sorted page
fn top_pool(mint: &str, response: PoolsResponse) -> Result<String, LookupError> {
    if !response.success {
        return Err(LookupError::Decode(format!(
            "pool query for {} rejected: {}",
            mint,
            response.msg.unwrap_or_else(|| "unknown error".to_string())
        )));
    }

    response
        .data
        .and_then(|page| page.data.into_iter().next())
        .map(|pool| pool.id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| LookupError::NoResults(format!("no pool data found for {}", mint)))
}
