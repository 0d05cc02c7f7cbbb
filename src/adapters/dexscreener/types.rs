//! DexScreener API Types

use serde::Deserialize;

/// `GET /latest/dex/pairs/{chainId}/{pairId}` response.
///
/// `pairs` is `null` when the pair id is unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct PairsResponse {
    #[serde(rename = "schemaVersion", default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub pairs: Option<Vec<PairEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairEntry {
    #[serde(rename = "chainId", default)]
    pub chain_id: Option<String>,
    #[serde(rename = "dexId", default)]
    pub dex_id: Option<String>,
    #[serde(rename = "pairAddress", default)]
    pub pair_address: Option<String>,
    #[serde(rename = "baseToken")]
    pub base_token: TokenRef,
    #[serde(rename = "quoteToken", default)]
    pub quote_token: Option<TokenRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenRef {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}
