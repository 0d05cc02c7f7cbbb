//! DexScreener Pairs Client
//!
//! Looks a pair up by id and returns the base token's mint address.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::ports::{AddressLookup, LookupError};
use super::types::PairsResponse;

/// Configuration for the DexScreenerClient
#[derive(Debug, Clone)]
pub struct DexScreenerConfig {
    /// API base, without trailing slash
    pub api_url: String,
    /// Chain segment of the pairs route
    pub chain_id: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.dexscreener.com/latest/dex".to_string(),
            chain_id: "solana".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the DexScreener pairs endpoint
#[derive(Debug, Clone)]
pub struct DexScreenerClient {
    config: DexScreenerConfig,
    http: Client,
}

impl DexScreenerClient {
    /// Create a new DexScreenerClient with default configuration
    pub fn new() -> Result<Self, LookupError> {
        Self::with_config(DexScreenerConfig::default())
    }

    /// Create a new DexScreenerClient with custom configuration
    pub fn with_config(config: DexScreenerConfig) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, http })
    }

    /// URL of the pairs route for `pair_id`
    pub fn pair_url(&self, pair_id: &str) -> String {
        format!(
            "{}/pairs/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.chain_id,
            pair_id
        )
    }

    /// Fetch the base-token mint for a pair
    pub async fn fetch_token_address(&self, pair_id: &str) -> Result<String, LookupError> {
        let response = self.http.get(self.pair_url(pair_id)).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::BadStatus(status));
        }

        let body = response.text().await?;
        let parsed: PairsResponse = serde_json::from_str(&body)?;
        first_base_token(pair_id, parsed)
    }

    pub fn config(&self) -> &DexScreenerConfig {
        &self.config
    }
}

#[async_trait]
impl AddressLookup for DexScreenerClient {
    async fn lookup_address(&self, pair_id: &str) -> Result<String, LookupError> {
        self.fetch_token_address(pair_id).await
    }
}

/// First pair's base-token address; that entry is authoritative
fn first_base_token(pair_id: &str, response: PairsResponse) -> Result<String, LookupError> {
    response
        .pairs
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|pair| pair.base_token.address)
        .filter(|address| !address.is_empty())
        .ok_or_else(|| LookupError::NoResults(format!("no pair data found for {}", pair_id)))
}
