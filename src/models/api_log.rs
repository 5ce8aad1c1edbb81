use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed API request, as retained by the request log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLog {
    pub id: u64,
    pub endpoint: String,
    pub method: String,
    /// Wall time spent handling the request, in milliseconds.
    pub response_time: u64,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
}

/// Request outcome as reported by a handler, before the log assigns an
/// id and timestamp.
#[derive(Debug, Clone)]
pub struct ApiLogRecord {
    pub endpoint: String,
    pub method: String,
    pub response_time: u64,
    pub status_code: u16,
}

/// Aggregate request statistics, recomputed from the log on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub average_response_time: f64,
    /// Percentage of retained requests with a 4xx/5xx status.
    pub error_rate: f64,
    /// `max(0, 100 - error_rate)`. A rough proxy derived from the error
    /// rate, not a real availability measurement; kept for compatibility
    /// with the existing API surface.
    pub uptime: f64,
}
