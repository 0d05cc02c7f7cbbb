use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors from an external address/pool lookup.
///
/// Every variant is recoverable: the enrichment stage logs it and leaves
/// the target field unset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Any other HTTP client failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream answered with a non-success status
    #[error("Bad response status: {0}")]
    BadStatus(StatusCode),

    /// Response body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Well-formed response without a usable entry
    #[error("No results for {0}")]
    NoResults(String),
}

impl LookupError {
    /// Transport-level failure (as opposed to a bad or empty answer)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LookupError::Timeout
                | LookupError::Network(_)
                | LookupError::Http(_)
                | LookupError::BadStatus(_)
        )
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if err.is_connect() {
            LookupError::Network(err.to_string())
        } else if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}

/// Resolves a token's mint address from its DexScreener pair id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Mint address of the pair's base token (first result wins)
    async fn lookup_address(&self, pair_id: &str) -> Result<String, LookupError>;
}

/// Resolves the deepest liquidity pool for a token mint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoolLookup: Send + Sync {
    /// Pool id of the most liquid pool pairing `mint` with the native asset
    async fn lookup_pool(&self, mint: &str) -> Result<String, LookupError>;
}

#[async_trait]
impl<T: AddressLookup + ?Sized> AddressLookup for std::sync::Arc<T> {
    async fn lookup_address(&self, pair_id: &str) -> Result<String, LookupError> {
        (**self).lookup_address(pair_id).await
    }
}

#[async_trait]
impl<T: PoolLookup + ?Sized> PoolLookup for std::sync::Arc<T> {
    async fn lookup_pool(&self, mint: &str) -> Result<String, LookupError> {
        (**self).lookup_pool(mint).await
    }
}
