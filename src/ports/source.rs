use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TokenRecord;

/// Listing scrape errors
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Bad response status: {status}, body: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Produces raw token records, one listing page at a time
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Scrape a single 1-based listing page.
    ///
    /// An empty vector means the listing has no more rows.
    async fn scrape_page(&self, page: u32) -> Result<Vec<TokenRecord>, ScrapeError>;
}
