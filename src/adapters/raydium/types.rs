//! Raydium v3 API Types

use serde::Deserialize;

/// `GET /pools/info/mint` response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct PoolsResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<PoolPage>,
}

fn default_success() -> bool {
    true
}

/// One page of pools, already sorted by the requested field
#[derive(Debug, Clone, Deserialize)]
pub struct PoolPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub data: Vec<PoolEntry>,
    #[serde(rename = "hasNextPage", default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolEntry {
    /// Pool id (the LP address)
    pub id: String,
    #[serde(rename = "type", default)]
    pub pool_type: Option<String>,
    #[serde(default)]
    pub tvl: Option<f64>,
}
