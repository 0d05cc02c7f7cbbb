//! ZenRows Listing Scraper
//!
//! DexScreener renders its tables client-side, so listing pages are fetched
//! through the ZenRows proxy with JavaScript rendering enabled and then
//! parsed with `listing::parse_listing`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::{AddressValidator, Base58Validator, TokenRecord};
use crate::ports::{PageSource, ScrapeError};
use super::listing::{parse_listing, ListingSelectors};

/// Listing filters passed through to DexScreener
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilters {
    pub min_24h_txns: u64,
    pub min_liquidity: u64,
    pub min_market_cap: u64,
    pub order: String,
    pub rank_by: String,
}

impl Default for ListingFilters {
    fn default() -> Self {
        Self {
            min_24h_txns: 50,
            min_liquidity: 100_000,
            min_market_cap: 5_000_000,
            order: "desc".to_string(),
            rank_by: "marketCap".to_string(),
        }
    }
}

impl ListingFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("min24HTxns", self.min_24h_txns.to_string()),
            ("minLiq", self.min_liquidity.to_string()),
            ("minMarketCap", self.min_market_cap.to_string()),
            ("order", self.order.clone()),
            ("rankBy", self.rank_by.clone()),
        ]
    }
}

/// Configuration for the ZenRowsScraper
#[derive(Clone)]
pub struct ZenRowsConfig {
    /// ZenRows API key (secret)
    pub api_key: String,
    /// ZenRows endpoint
    pub zenrows_url: String,
    /// DexScreener listing, page 1
    pub target_url: String,
    /// Only rows quoted in this token are kept
    pub quote_symbol: String,
    pub filters: ListingFilters,
    /// Ask ZenRows to execute page JavaScript
    pub js_render: bool,
    /// Per-request timeout (rendering is slow)
    pub timeout: Duration,
}

impl ZenRowsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            zenrows_url: "https://api.zenrows.com/v1/".to_string(),
            target_url: "https://dexscreener.com/solana/raydium".to_string(),
            quote_symbol: "SOL".to_string(),
            filters: ListingFilters::default(),
            js_render: true,
            timeout: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for ZenRowsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZenRowsConfig")
            .field("api_key", &"<redacted>")
            .field("zenrows_url", &self.zenrows_url)
            .field("target_url", &self.target_url)
            .field("quote_symbol", &self.quote_symbol)
            .field("filters", &self.filters)
            .field("js_render", &self.js_render)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Scrapes DexScreener listing pages through ZenRows
pub struct ZenRowsScraper {
    config: ZenRowsConfig,
    http: Client,
    selectors: ListingSelectors,
    validator: Arc<dyn AddressValidator>,
}

impl ZenRowsScraper {
    /// Create a scraper with the strict base58 address check
    pub fn new(config: ZenRowsConfig) -> Result<Self, ScrapeError> {
        Self::with_validator(config, Arc::new(Base58Validator))
    }

    /// Create a scraper with a custom address predicate
    pub fn with_validator(
        config: ZenRowsConfig,
        validator: Arc<dyn AddressValidator>,
    ) -> Result<Self, ScrapeError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http,
            selectors: ListingSelectors::new()?,
            validator,
        })
    }

    /// DexScreener URL for a 1-based listing page, filters included
    pub fn listing_url(&self, page: u32) -> Result<Url, ScrapeError> {
        let base = self.config.target_url.trim_end_matches('/');
        let raw = if page > 1 {
            format!("{}/page-{}", base, page)
        } else {
            base.to_string()
        };

        let mut url = Url::parse(&raw).map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", raw, e)))?;
        url.query_pairs_mut()
            .extend_pairs(self.config.filters.query_pairs());
        Ok(url)
    }

    /// ZenRows request URL wrapping the listing URL
    pub fn proxy_url(&self, listing: &Url) -> Result<Url, ScrapeError> {
        let mut url = Url::parse(&self.config.zenrows_url)
            .map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", self.config.zenrows_url, e)))?;
        url.query_pairs_mut()
            .append_pair("apikey", &self.config.api_key)
            .append_pair("url", listing.as_str());
        if self.config.js_render {
            url.query_pairs_mut().append_pair("js_render", "true");
        }
        Ok(url)
    }

    async fn fetch_document(&self, url: Url) -> Result<String, ScrapeError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }

    pub fn config(&self) -> &ZenRowsConfig {
        &self.config
    }
}

#[async_trait]
impl PageSource for ZenRowsScraper {
    async fn scrape_page(&self, page: u32) -> Result<Vec<TokenRecord>, ScrapeError> {
        let listing = self.listing_url(page)?;
        tracing::debug!("Fetching listing {}", listing);

        let html = self.fetch_document(self.proxy_url(&listing)?).await?;
        Ok(parse_listing(
            &html,
            &self.selectors,
            &self.config.quote_symbol,
            self.validator.as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> ZenRowsScraper {
        ZenRowsScraper::new(ZenRowsConfig::new("test-key")).unwrap()
    }

    #[test]
    fn test_first_page_url() {
        let url = scraper().listing_url(1).unwrap();
        assert_eq!(url.path(), "/solana/raydium");
        assert_eq!(
            url.query(),
            Some("min24HTxns=50&minLiq=100000&minMarketCap=5000000&order=desc&rankBy=marketCap")
        );
    }

    #[test]
    fn test_later_page_url() {
        let url = scraper().listing_url(3).unwrap();
        assert_eq!(url.path(), "/solana/raydium/page-3");
    }

    #[test]
    fn test_proxy_url_wraps_listing() {
        let s = scraper();
        let listing = s.listing_url(2).unwrap();
        let proxy = s.proxy_url(&listing).unwrap();

        assert_eq!(proxy.host_str(), Some("api.zenrows.com"));
        let pairs: Vec<(String, String)> = proxy.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("apikey".to_string(), "test-key".to_string())));
        assert!(pairs.contains(&("url".to_string(), listing.to_string())));
        assert!(pairs.contains(&("js_render".to_string(), "true".to_string())));
    }

    #[test]
    fn test_invalid_target_url() {
        let mut config = ZenRowsConfig::new("k");
        config.target_url = "not a url".to_string();
        let s = ZenRowsScraper::new(config).unwrap();
        assert!(matches!(s.listing_url(1), Err(ScrapeError::InvalidUrl(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ZenRowsConfig::new("super-secret");
        let text = format!("{:?}", config);
        assert!(!text.contains("super-secret"));
        assert!(text.contains("<redacted>"));
    }
}
