//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/default.toml.
//! Every section is optional; missing keys take the defaults below.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::adapters::dexscreener::DexScreenerConfig;
use crate::adapters::export::DEFAULT_EXPORT_DIR;
use crate::adapters::raydium::{RaydiumConfig, WSOL_MINT};
use crate::adapters::storage::DEFAULT_SNAPSHOT_DIR;
use crate::adapters::zenrows::{ListingFilters, ZenRowsConfig};
use crate::application::stage::{DEFAULT_CONCURRENCY, DEFAULT_PACING_DELAY};
use crate::application::{CollectConfig, StageLimits, DEFAULT_MAX_PAGES, DEFAULT_PAGE_DELAY};
use crate::domain::AddressValidation;

/// Environment variable holding the ZenRows API key
pub const ZENROWS_API_KEY_VAR: &str = "ZENROWS_API_KEY";

/// Config file picked up when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperSection,
    pub dexscreener: DexScreenerSection,
    pub raydium: RaydiumSection,
    pub enrichment: EnrichmentSection,
    pub storage: StorageSection,
    pub export: ExportSection,
    pub logging: LoggingSection,
}

/// Listing scraper (ZenRows) section
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ScraperSection {
    /// Optional API key; ZENROWS_API_KEY is used when unset
    pub api_key: Option<String>,
    pub zenrows_url: String,
    /// DexScreener listing page 1
    pub target_url: String,
    /// Quote token a row must be paired with
    pub quote_symbol: String,
    /// Last listing page to scrape
    pub max_pages: u32,
    /// Pause between listing pages in milliseconds
    pub page_delay_ms: u64,
    pub js_render: bool,
    pub timeout_secs: u64,
    /// Address check applied to scraped icon file names
    pub address_validation: AddressValidation,
    pub filters: FiltersSection,
}

impl Default for ScraperSection {
    fn default() -> Self {
        Self {
            api_key: None,
            zenrows_url: "https://api.zenrows.com/v1/".to_string(),
            target_url: "https://dexscreener.com/solana/raydium".to_string(),
            quote_symbol: "SOL".to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            page_delay_ms: DEFAULT_PAGE_DELAY.as_millis() as u64,
            js_render: true,
            timeout_secs: 60,
            address_validation: AddressValidation::default(),
            filters: FiltersSection::default(),
        }
    }
}

impl fmt::Debug for ScraperSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScraperSection")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("zenrows_url", &self.zenrows_url)
            .field("target_url", &self.target_url)
            .field("quote_symbol", &self.quote_symbol)
            .field("max_pages", &self.max_pages)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("js_render", &self.js_render)
            .field("timeout_secs", &self.timeout_secs)
            .field("address_validation", &self.address_validation)
            .field("filters", &self.filters)
            .finish()
    }
}

/// DexScreener listing filters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FiltersSection {
    pub min_24h_txns: u64,
    pub min_liquidity: u64,
    pub min_market_cap: u64,
    pub order: String,
    pub rank_by: String,
}

impl Default for FiltersSection {
    fn default() -> Self {
        let filters = ListingFilters::default();
        Self {
            min_24h_txns: filters.min_24h_txns,
            min_liquidity: filters.min_liquidity,
            min_market_cap: filters.min_market_cap,
            order: filters.order,
            rank_by: filters.rank_by,
        }
    }
}

/// DexScreener pairs API section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DexScreenerSection {
    pub api_url: String,
    pub chain_id: String,
    pub timeout_secs: u64,
}

impl Default for DexScreenerSection {
    fn default() -> Self {
        let defaults = DexScreenerConfig::default();
        Self {
            api_url: defaults.api_url,
            chain_id: defaults.chain_id,
            timeout_secs: defaults.timeout.as_secs(),
        }
    }
}

/// Raydium pool API section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaydiumSection {
    pub api_url: String,
    /// Quote side of the pool (wrapped SOL)
    pub quote_mint: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for RaydiumSection {
    fn default() -> Self {
        Self {
            api_url: "https://api-v3.raydium.io".to_string(),
            quote_mint: WSOL_MINT.to_string(),
            page_size: 1000,
            timeout_secs: 10,
        }
    }
}

/// Lookup concurrency section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentSection {
    /// Maximum lookups in flight per stage
    pub concurrency: usize,
    /// Delay after each lookup, slot still held
    pub pacing_delay_ms: u64,
}

impl Default for EnrichmentSection {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            pacing_delay_ms: DEFAULT_PACING_DELAY.as_millis() as u64,
        }
    }
}

/// Daily snapshot section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub enabled: bool,
    pub snapshot_dir: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot_dir: DEFAULT_SNAPSHOT_DIR.to_string(),
        }
    }
}

/// CSV export section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub enabled: bool,
    pub export_dir: String,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            enabled: true,
            export_dir: DEFAULT_EXPORT_DIR.to_string(),
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Missing secret: {0} is not set")]
    MissingSecret(&'static str),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load the given file, or `config.toml` if present, or the defaults
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => {
            tracing::debug!("No config file, using defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Parse and validate configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scraper.max_pages == 0 {
            return Err(ConfigError::ValidationError(
                "scraper.max_pages must be >= 1".to_string(),
            ));
        }

        if self.enrichment.concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "enrichment.concurrency must be >= 1".to_string(),
            ));
        }

        let required = [
            ("scraper.zenrows_url", &self.scraper.zenrows_url),
            ("scraper.target_url", &self.scraper.target_url),
            ("scraper.quote_symbol", &self.scraper.quote_symbol),
            ("dexscreener.api_url", &self.dexscreener.api_url),
            ("dexscreener.chain_id", &self.dexscreener.chain_id),
            ("raydium.api_url", &self.raydium.api_url),
            ("raydium.quote_mint", &self.raydium.quote_mint),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{} cannot be empty", key)));
            }
        }

        for (key, value) in [
            ("scraper.zenrows_url", &self.scraper.zenrows_url),
            ("scraper.target_url", &self.scraper.target_url),
            ("dexscreener.api_url", &self.dexscreener.api_url),
            ("raydium.api_url", &self.raydium.api_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", key, e)))?;
        }

        if self.raydium.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "raydium.page_size must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    /// ZenRows API key: config value first, then ZENROWS_API_KEY
    pub fn zenrows_api_key(&self) -> Result<String, ConfigError> {
        self.scraper.api_key_or(std::env::var(ZENROWS_API_KEY_VAR).ok())
    }

    /// Scraper settings with the API key resolved
    pub fn zenrows_config(&self) -> Result<ZenRowsConfig, ConfigError> {
        let s = &self.scraper;
        Ok(ZenRowsConfig {
            api_key: self.zenrows_api_key()?,
            zenrows_url: s.zenrows_url.clone(),
            target_url: s.target_url.clone(),
            quote_symbol: s.quote_symbol.clone(),
            filters: ListingFilters {
                min_24h_txns: s.filters.min_24h_txns,
                min_liquidity: s.filters.min_liquidity,
                min_market_cap: s.filters.min_market_cap,
                order: s.filters.order.clone(),
                rank_by: s.filters.rank_by.clone(),
            },
            js_render: s.js_render,
            timeout: Duration::from_secs(s.timeout_secs),
        })
    }

    pub fn collect_config(&self) -> CollectConfig {
        CollectConfig {
            max_pages: self.scraper.max_pages,
            page_delay: Duration::from_millis(self.scraper.page_delay_ms),
        }
    }

    pub fn stage_limits(&self) -> StageLimits {
        StageLimits::new(
            self.enrichment.concurrency,
            Duration::from_millis(self.enrichment.pacing_delay_ms),
        )
    }

    /// Snapshot directory with `~` expanded
    pub fn snapshot_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage.snapshot_dir).to_string())
    }

    /// Export directory with `~` expanded
    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.export.export_dir).to_string())
    }
}

impl ScraperSection {
    fn api_key_or(&self, env_value: Option<String>) -> Result<String, ConfigError> {
        self.api_key
            .iter()
            .chain(env_value.iter())
            .map(|key| key.trim())
            .find(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or(ConfigError::MissingSecret(ZENROWS_API_KEY_VAR))
    }
}

impl From<&Config> for DexScreenerConfig {
    fn from(config: &Config) -> Self {
        DexScreenerConfig {
            api_url: config.dexscreener.api_url.clone(),
            chain_id: config.dexscreener.chain_id.clone(),
            timeout: Duration::from_secs(config.dexscreener.timeout_secs),
        }
    }
}

impl From<&Config> for RaydiumConfig {
    fn from(config: &Config) -> Self {
        RaydiumConfig {
            api_url: config.raydium.api_url.clone(),
            quote_mint: config.raydium.quote_mint.clone(),
            page_size: config.raydium.page_size,
            timeout: Duration::from_secs(config.raydium.timeout_secs),
        }
    }
}
