use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::models::{
    ApiLog, ApiLogRecord, ApiMetrics, Pool, PoolRecord, PoolUpdate, Token, TokenRecord,
    TokenUpdate,
};
use crate::services::request_log::RequestLog;

#[derive(Debug)]
pub enum StoreError {
    /// A record with this natural key already exists. The existing record
    /// is left untouched; callers ignore this and re-read.
    Duplicate(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Duplicate(key) => write!(f, "record already exists: {}", key),
        }
    }
}

impl std::error::Error for StoreError {}

/// A record that can live in an [`EntityStore`]: it has a natural string
/// key, is built from a provider draft, and merges partial updates.
pub trait Entity: Clone {
    type Draft;
    type Patch;

    fn key(&self) -> &str;
    fn draft_key(draft: &Self::Draft) -> &str;
    fn build(id: u64, draft: Self::Draft, now: DateTime<Utc>) -> Self;
    fn merge(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

struct Inner<T> {
    /// Records in insertion order. Nothing is ever removed, so positions
    /// in `index` stay valid for the life of the process.
    records: Vec<T>,
    index: HashMap<String, usize>,
    next_id: u64,
}

/// Keyed in-memory store with first-write-wins creation.
///
/// `create` and `update` are read-modify-write, so the whole store sits
/// behind one RwLock; reads share the read lock.
pub struct EntityStore<T: Entity> {
    inner: RwLock<Inner<T>>,
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                index: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let inner = self.inner.read();
        inner.index.get(key).map(|&position| inner.records[position].clone())
    }

    /// All records, in insertion order.
    pub fn get_all(&self) -> Vec<T> {
        self.inner.read().records.clone()
    }

    /// Stores a new record under its natural key, assigning the next id
    /// and fresh timestamps. An occupied key is an error and leaves the
    /// existing record exactly as it was.
    pub fn create(&self, draft: T::Draft) -> Result<T, StoreError> {
        let mut inner = self.inner.write();
        let key = T::draft_key(&draft);
        if inner.index.contains_key(key) {
            return Err(StoreError::Duplicate(key.to_string()));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let position = inner.records.len();
        let record = T::build(id, draft, Utc::now());
        inner.index.insert(record.key().to_string(), position);
        inner.records.push(record.clone());
        Ok(record)
    }

    /// Merges the provided fields onto an existing record and bumps its
    /// `updated_at`. Returns `None` if the key is unknown; never creates.
    pub fn update(&self, key: &str, patch: T::Patch) -> Option<T> {
        let mut inner = self.inner.write();
        let position = *inner.index.get(key)?;
        let record = &mut inner.records[position];
        record.merge(patch, Utc::now());
        Some(record.clone())
    }
}

impl Entity for Pool {
    type Draft = PoolRecord;
    type Patch = PoolUpdate;

    fn key(&self) -> &str {
        &self.pool_id
    }

    fn draft_key(draft: &PoolRecord) -> &str {
        &draft.pool_id
    }

    fn build(id: u64, draft: PoolRecord, now: DateTime<Utc>) -> Self {
        Pool {
            id,
            pool_id: draft.pool_id,
            base_token_mint: draft.base_token_mint,
            quote_token_mint: draft.quote_token_mint,
            lp_token_mint: draft.lp_token_mint,
            base_token_reserve: draft.base_token_reserve,
            quote_token_reserve: draft.quote_token_reserve,
            tvl: draft.tvl,
            volume_24h: draft.volume_24h,
            apy: draft.apy,
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, patch: PoolUpdate, now: DateTime<Utc>) {
        if let Some(v) = patch.base_token_mint {
            self.base_token_mint = v;
        }
        if let Some(v) = patch.quote_token_mint {
            self.quote_token_mint = v;
        }
        if let Some(v) = patch.lp_token_mint {
            self.lp_token_mint = v;
        }
        if let Some(v) = patch.base_token_reserve {
            self.base_token_reserve = v;
        }
        if let Some(v) = patch.quote_token_reserve {
            self.quote_token_reserve = v;
        }
        if let Some(v) = patch.tvl {
            self.tvl = Some(v);
        }
        if let Some(v) = patch.volume_24h {
            self.volume_24h = Some(v);
        }
        if let Some(v) = patch.apy {
            self.apy = Some(v);
        }
        self.updated_at = now;
    }
}

impl Entity for Token {
    type Draft = TokenRecord;
    type Patch = TokenUpdate;

    fn key(&self) -> &str {
        &self.mint
    }

    fn draft_key(draft: &TokenRecord) -> &str {
        &draft.mint
    }

    fn build(id: u64, draft: TokenRecord, now: DateTime<Utc>) -> Self {
        Token {
            id,
            mint: draft.mint,
            symbol: draft.symbol,
            name: draft.name,
            decimals: draft.decimals,
            logo_uri: draft.logo_uri,
            price: draft.price,
            market_cap: draft.market_cap,
            volume_24h: draft.volume_24h,
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, patch: TokenUpdate, now: DateTime<Utc>) {
        if let Some(v) = patch.symbol {
            self.symbol = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.decimals {
            self.decimals = v;
        }
        if let Some(v) = patch.logo_uri {
            self.logo_uri = Some(v);
        }
        if let Some(v) = patch.price {
            self.price = Some(v);
        }
        if let Some(v) = patch.market_cap {
            self.market_cap = Some(v);
        }
        if let Some(v) = patch.volume_24h {
            self.volume_24h = Some(v);
        }
        self.updated_at = now;
    }
}

/// Process-wide in-memory storage: pool and token stores plus the request
/// log. Constructed once in `main` and handed to handlers behind an `Arc`
/// so tests can spin up isolated instances.
pub struct MemStorage {
    pools: EntityStore<Pool>,
    tokens: EntityStore<Token>,
    logs: RequestLog,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            pools: EntityStore::new(),
            tokens: EntityStore::new(),
            logs: RequestLog::new(),
        }
    }

    pub fn get_pool(&self, pool_id: &str) -> Option<Pool> {
        self.pools.get(pool_id)
    }

    pub fn get_all_pools(&self) -> Vec<Pool> {
        self.pools.get_all()
    }

    pub fn create_pool(&self, draft: PoolRecord) -> Result<Pool, StoreError> {
        self.pools.create(draft)
    }

    pub fn update_pool(&self, pool_id: &str, patch: PoolUpdate) -> Option<Pool> {
        self.pools.update(pool_id, patch)
    }

    pub fn get_token(&self, mint: &str) -> Option<Token> {
        self.tokens.get(mint)
    }

    pub fn get_all_tokens(&self) -> Vec<Token> {
        self.tokens.get_all()
    }

    pub fn create_token(&self, draft: TokenRecord) -> Result<Token, StoreError> {
        self.tokens.create(draft)
    }

    pub fn update_token(&self, mint: &str, patch: TokenUpdate) -> Option<Token> {
        self.tokens.update(mint, patch)
    }

    pub fn log_request(&self, record: ApiLogRecord) -> ApiLog {
        self.logs.append(record)
    }

    pub fn recent_requests(&self, limit: usize) -> Vec<ApiLog> {
        self.logs.recent(limit)
    }

    pub fn metrics(&self) -> ApiMetrics {
        self.logs.metrics()
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}
