use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::models::{ApiLogRecord, SwapQuoteRequest};
use crate::services::{MemStorage, StoreError};
use crate::sources::{PoolProvider, QuoteProvider, TokenProvider};

pub struct AppState {
    pub storage: Arc<MemStorage>,
    pub pools: Arc<dyn PoolProvider>,
    pub tokens: Arc<dyn TokenProvider>,
    pub quotes: Arc<dyn QuoteProvider>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/pools", get(get_pools))
        .route("/api/pools/:pool_id", get(get_pool))
        .route("/api/tokens", get(get_tokens))
        .route("/api/tokens/:mint", get(get_token))
        .route("/api/swap/quote", post(swap_quote))
        .route("/api/metrics", get(get_metrics))
        .route("/api/docs", get(docs))
        .with_state(state)
}

/// Request-log hook; every handler calls this once, after it knows the
/// outcome.
fn track(state: &AppState, endpoint: String, method: &str, started: Instant, status: StatusCode) {
    state.storage.log_request(ApiLogRecord {
        endpoint,
        method: method.to_string(),
        response_time: started.elapsed().as_millis() as u64,
        status_code: status.as_u16(),
    });
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let started = Instant::now();
    track(&state, "/api/health".to_string(), "GET", started, StatusCode::OK);

    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "metrics": state.storage.metrics(),
    }))
}

/// GET /api/pools - refresh from upstream, then serve everything cached
async fn get_pools(State(state): State<Arc<AppState>>) -> Json<Value> {
    let started = Instant::now();

    let records = match state.pools.fetch_pools().await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Pool provider {} error: {}", state.pools.name(), e);
            Vec::new()
        }
    };

    for record in records {
        if let Err(StoreError::Duplicate(pool_id)) = state.storage.create_pool(record) {
            // First write wins; the cached snapshot stays as-is.
            tracing::debug!("Pool {} already cached", pool_id);
        }
    }

    let pools = state.storage.get_all_pools();
    track(&state, "/api/pools".to_string(), "GET", started, StatusCode::OK);

    Json(json!({
        "pools": pools,
        "count": pools.len(),
        "updated": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/pools/:pool_id
async fn get_pool(
    State(state): State<Arc<AppState>>,
    Path(pool_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let pool = state.storage.get_pool(&pool_id);
    let status = if pool.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    track(&state, format!("/api/pools/{}", pool_id), "GET", started, status);

    match pool {
        Some(pool) => (StatusCode::OK, Json(json!(pool))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Pool not found", "poolId": pool_id })),
        ),
    }
}

/// GET /api/tokens
async fn get_tokens(State(state): State<Arc<AppState>>) -> Json<Value> {
    let started = Instant::now();

    let records = match state.tokens.fetch_tokens().await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Token provider {} error: {}", state.tokens.name(), e);
            Vec::new()
        }
    };

    for record in records {
        if let Err(StoreError::Duplicate(mint)) = state.storage.create_token(record) {
            tracing::debug!("Token {} already cached", mint);
        }
    }

    let tokens = state.storage.get_all_tokens();
    track(&state, "/api/tokens".to_string(), "GET", started, StatusCode::OK);

    Json(json!({
        "tokens": tokens,
        "count": tokens.len(),
        "updated": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/tokens/:mint
async fn get_token(
    State(state): State<Arc<AppState>>,
    Path(mint): Path<String>,
) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let token = state.storage.get_token(&mint);
    let status = if token.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    track(&state, format!("/api/tokens/{}", mint), "GET", started, status);

    match token {
        Some(token) => (StatusCode::OK, Json(json!(token))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Token not found", "mint": mint })),
        ),
    }
}

/// POST /api/swap/quote
async fn swap_quote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SwapQuoteRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let started = Instant::now();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(_) => {
            track(&state, "/api/swap/quote".to_string(), "POST", started, StatusCode::BAD_REQUEST);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid swap parameters" })),
            );
        }
    };

    if let Err(reason) = request.validate() {
        tracing::debug!("Rejected swap quote request: {}", reason);
        track(&state, "/api/swap/quote".to_string(), "POST", started, StatusCode::BAD_REQUEST);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid swap parameters" })),
        );
    }

    let quote = match state.quotes.quote(&request).await {
        Ok(quote) => quote,
        Err(e) => {
            tracing::warn!("Quote provider {} error: {}", state.quotes.name(), e);
            None
        }
    };

    let status = if quote.is_some() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    track(&state, "/api/swap/quote".to_string(), "POST", started, status);

    match quote {
        Some(quote) => (StatusCode::OK, Json(json!(quote))),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Unable to calculate swap quote with current parameters" })),
        ),
    }
}

/// GET /api/metrics - aggregates plus the most recent requests. Computed
/// before this request is logged, so it never counts itself.
async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<Value> {
    let started = Instant::now();
    let metrics = state.storage.metrics();
    let recent = state.storage.recent_requests(20);
    track(&state, "/api/metrics".to_string(), "GET", started, StatusCode::OK);

    Json(json!({
        "totalRequests": metrics.total_requests,
        "averageResponseTime": metrics.average_response_time,
        "errorRate": metrics.error_rate,
        "uptime": metrics.uptime,
        "recentRequests": recent,
    }))
}

/// GET /api/docs - endpoint catalogue. Deliberately not request-logged.
async fn docs() -> Json<Value> {
    Json(json!({
        "title": "Solana DEX API",
        "description": "Liquidity pool, token, and swap quote data over Raydium and Jupiter",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            { "path": "/api/health", "method": "GET", "description": "Health check with request metrics" },
            { "path": "/api/pools", "method": "GET", "description": "Raydium liquidity pools" },
            { "path": "/api/pools/:poolId", "method": "GET", "description": "Single pool by id" },
            { "path": "/api/tokens", "method": "GET", "description": "Token list from Raydium" },
            { "path": "/api/tokens/:mint", "method": "GET", "description": "Single token by mint address" },
            { "path": "/api/swap/quote", "method": "POST", "description": "Swap quote via Jupiter" },
            { "path": "/api/metrics", "method": "GET", "description": "API performance metrics" },
            { "path": "/api/docs", "method": "GET", "description": "This documentation" }
        ],
    }))
}
