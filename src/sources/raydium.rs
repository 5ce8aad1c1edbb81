use reqwest::Client;
use serde::Deserialize;

use super::{PoolProvider, ProviderError, TokenProvider};
use crate::models::{PoolRecord, TokenRecord};
use async_trait::async_trait;

/// Raydium v3 HTTP API: pool list and mint list.
pub struct RaydiumProvider {
    client: Client,
    base_url: String,
    fetch_limit: usize,
}

impl RaydiumProvider {
    pub fn new(base_url: &str, timeout_secs: u64, fetch_limit: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch_limit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PoolListResponse {
    success: bool,
    data: Option<PoolListPage>,
}

#[derive(Debug, Deserialize)]
struct PoolListPage {
    #[serde(default)]
    data: Vec<RaydiumPool>,
}

#[derive(Debug, Deserialize)]
struct RaydiumPool {
    id: String,
    #[serde(rename = "mintA")]
    mint_a: Option<RaydiumMint>,
    #[serde(rename = "mintB")]
    mint_b: Option<RaydiumMint>,
    #[serde(rename = "lpMint")]
    lp_mint: Option<RaydiumMint>,
    #[serde(rename = "mintAmountA")]
    mint_amount_a: Option<f64>,
    #[serde(rename = "mintAmountB")]
    mint_amount_b: Option<f64>,
    tvl: Option<f64>,
    day: Option<RaydiumDayStats>,
}

#[derive(Debug, Deserialize)]
struct RaydiumMint {
    address: String,
    symbol: Option<String>,
    name: Option<String>,
    decimals: Option<u8>,
    #[serde(rename = "logoURI")]
    logo_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RaydiumDayStats {
    volume: Option<f64>,
    apr: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MintListResponse {
    success: bool,
    data: Option<MintListPage>,
}

#[derive(Debug, Deserialize)]
struct MintListPage {
    #[serde(rename = "mintList", default)]
    mint_list: Vec<RaydiumMint>,
}

fn reserve_string(amount: Option<f64>) -> String {
    amount.map(|v| v.to_string()).unwrap_or_else(|| "0".to_string())
}

fn pool_records(pools: Vec<RaydiumPool>, limit: usize) -> Vec<PoolRecord> {
    pools
        .into_iter()
        .take(limit)
        .filter_map(|pool| {
            // Skip entries with an incomplete mint triple rather than
            // caching half a pool.
            let base = pool.mint_a?;
            let quote = pool.mint_b?;
            let lp = pool.lp_mint?;

            Some(PoolRecord {
                pool_id: pool.id,
                base_token_mint: base.address,
                quote_token_mint: quote.address,
                lp_token_mint: lp.address,
                base_token_reserve: reserve_string(pool.mint_amount_a),
                quote_token_reserve: reserve_string(pool.mint_amount_b),
                tvl: pool.tvl,
                volume_24h: pool.day.as_ref().and_then(|d| d.volume),
                apy: pool.day.as_ref().and_then(|d| d.apr),
            })
        })
        .collect()
}

fn token_records(mints: Vec<RaydiumMint>, limit: usize) -> Vec<TokenRecord> {
    mints
        .into_iter()
        .take(limit)
        .map(|mint| TokenRecord {
            mint: mint.address,
            symbol: mint.symbol.unwrap_or_else(|| "UNKNOWN".to_string()),
            name: mint.name.unwrap_or_else(|| "Unknown Token".to_string()),
            decimals: mint.decimals.unwrap_or(0),
            logo_uri: mint.logo_uri,
            // Live pricing would need a separate price feed.
            price: None,
            market_cap: None,
            volume_24h: None,
        })
        .collect()
}

#[async_trait]
impl PoolProvider for RaydiumProvider {
    fn name(&self) -> &'static str {
        "Raydium"
    }

    async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, ProviderError> {
        let url = format!(
            "{}/pools/info/list?poolType=Standard&poolSortField=default&sortType=desc&pageSize={}&page=1",
            self.base_url, self.fetch_limit
        );

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == 429 {
            return Err(ProviderError::RateLimit);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Upstream(format!(
                "pool list returned {}",
                resp.status()
            )));
        }

        let body: PoolListResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if !body.success {
            return Err(ProviderError::Upstream("pool list reported failure".to_string()));
        }

        let pools = body.data.map(|page| page.data).unwrap_or_default();
        Ok(pool_records(pools, self.fetch_limit))
    }
}

#[async_trait]
impl TokenProvider for RaydiumProvider {
    fn name(&self) -> &'static str {
        "Raydium"
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, ProviderError> {
        let url = format!("{}/mint/list", self.base_url);

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == 429 {
            return Err(ProviderError::RateLimit);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Upstream(format!(
                "mint list returned {}",
                resp.status()
            )));
        }

        let body: MintListResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if !body.success {
            return Err(ProviderError::Upstream("mint list reported failure".to_string()));
        }

        let mints = body.data.map(|page| page.mint_list).unwrap_or_default();
        Ok(token_records(mints, self.fetch_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_list_reshapes_into_records() {
        let body: PoolListResponse = serde_json::from_str(
            r#"{
                "success": true,
                "data": {
                    "count": 2,
                    "data": [
                        {
                            "id": "pool-1",
                            "mintA": {"address": "mint-a", "symbol": "SOL", "decimals": 9},
                            "mintB": {"address": "mint-b", "symbol": "USDC", "decimals": 6},
                            "lpMint": {"address": "mint-lp"},
                            "mintAmountA": 1234.5,
                            "mintAmountB": 67890.0,
                            "tvl": 150000.5,
                            "day": {"volume": 42000.0, "apr": 12.5}
                        },
                        {
                            "id": "pool-2",
                            "mintA": {"address": "mint-a"},
                            "mintB": {"address": "mint-b"}
                        }
                    ]
                }
            }"#,
        )
        .unwrap();

        let records = pool_records(body.data.unwrap().data, 10);
        // pool-2 is missing its LP mint and is skipped.
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.pool_id, "pool-1");
        assert_eq!(record.base_token_mint, "mint-a");
        assert_eq!(record.quote_token_mint, "mint-b");
        assert_eq!(record.lp_token_mint, "mint-lp");
        assert_eq!(record.base_token_reserve, "1234.5");
        assert_eq!(record.quote_token_reserve, "67890");
        assert_eq!(record.tvl, Some(150000.5));
        assert_eq!(record.volume_24h, Some(42000.0));
        assert_eq!(record.apy, Some(12.5));
    }

    #[test]
    fn mint_list_fills_missing_metadata() {
        let body: MintListResponse = serde_json::from_str(
            r#"{
                "success": true,
                "data": {
                    "mintList": [
                        {
                            "address": "mint-a",
                            "symbol": "SOL",
                            "name": "Wrapped SOL",
                            "decimals": 9,
                            "logoURI": "https://img.example/sol.png"
                        },
                        {"address": "mint-b"}
                    ]
                }
            }"#,
        )
        .unwrap();

        let records = token_records(body.data.unwrap().mint_list, 10);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol, "SOL");
        assert_eq!(records[0].logo_uri.as_deref(), Some("https://img.example/sol.png"));
        assert_eq!(records[1].symbol, "UNKNOWN");
        assert_eq!(records[1].decimals, 0);
        assert!(records[1].price.is_none());
    }

    #[test]
    fn fetch_limit_caps_both_lists() {
        let mints = vec![
            RaydiumMint {
                address: "a".into(),
                symbol: None,
                name: None,
                decimals: None,
                logo_uri: None,
            },
            RaydiumMint {
                address: "b".into(),
                symbol: None,
                name: None,
                decimals: None,
                logo_uri: None,
            },
        ];
        assert_eq!(token_records(mints, 1).len(), 1);
    }
}
