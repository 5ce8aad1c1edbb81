pub mod jupiter;
pub mod raydium;

use async_trait::async_trait;

use crate::models::{PoolRecord, SwapQuote, SwapQuoteRequest, TokenRecord};

/// Upstream source of liquidity pool snapshots.
#[async_trait]
pub trait PoolProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, ProviderError>;
}

/// Upstream source of token metadata.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, ProviderError>;
}

/// Upstream swap-quote aggregator. `Ok(None)` means the upstream found
/// no route for the pair, as opposed to a transport or parse failure.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn quote(&self, request: &SwapQuoteRequest) -> Result<Option<SwapQuote>, ProviderError>;
}

#[derive(Debug)]
pub enum ProviderError {
    Network(String),
    Parse(String),
    RateLimit,
    Upstream(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Network(e) => write!(f, "Network error: {}", e),
            ProviderError::Parse(e) => write!(f, "Parse error: {}", e),
            ProviderError::RateLimit => write!(f, "Rate limited"),
            ProviderError::Upstream(e) => write!(f, "Upstream error: {}", e),
        }
    }
}

impl std::error::Error for ProviderError {}
