pub mod api_log;
pub mod pool;
pub mod quote;
pub mod token;

pub use api_log::{ApiLog, ApiLogRecord, ApiMetrics};
pub use pool::{Pool, PoolRecord, PoolUpdate};
pub use quote::{SwapQuote, SwapQuoteRequest};
pub use token::{Token, TokenRecord, TokenUpdate};
