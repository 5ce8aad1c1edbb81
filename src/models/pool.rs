use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored liquidity pool snapshot, keyed by `pool_id`.
///
/// Reserves are kept as decimal strings: on-chain amounts exceed what an
/// f64 can represent exactly, so the API passes them through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: u64,
    pub pool_id: String,
    pub base_token_mint: String,
    pub quote_token_mint: String,
    pub lp_token_mint: String,
    pub base_token_reserve: String,
    pub quote_token_reserve: String,
    pub tvl: Option<f64>,
    pub volume_24h: Option<f64>,
    pub apy: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pool data as returned by an upstream provider, before the store
/// assigns an id and timestamps.
#[derive(Debug, Clone)]
pub struct PoolRecord {
    pub pool_id: String,
    pub base_token_mint: String,
    pub quote_token_mint: String,
    pub lp_token_mint: String,
    pub base_token_reserve: String,
    pub quote_token_reserve: String,
    pub tvl: Option<f64>,
    pub volume_24h: Option<f64>,
    pub apy: Option<f64>,
}

/// Partial update for a stored pool. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PoolUpdate {
    pub base_token_mint: Option<String>,
    pub quote_token_mint: Option<String>,
    pub lp_token_mint: Option<String>,
    pub base_token_reserve: Option<String>,
    pub quote_token_reserve: Option<String>,
    pub tvl: Option<f64>,
    pub volume_24h: Option<f64>,
    pub apy: Option<f64>,
}
