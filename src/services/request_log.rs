use std::collections::VecDeque;

use chrono::Utc;
use parking_lot::RwLock;

use crate::models::{ApiLog, ApiLogRecord, ApiMetrics};

/// Retention cap. Once exceeded the oldest entries are evicted first.
const MAX_LOGS: usize = 10_000;

struct Inner {
    logs: VecDeque<ApiLog>,
    next_id: u64,
}

/// Append-only bounded log of completed API requests.
///
/// The buffer is owned exclusively by this type; `append` is the only
/// mutator. Metrics are recomputed from the current snapshot on every
/// read, which is cheap at the 10k cap.
pub struct RequestLog {
    inner: RwLock<Inner>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                logs: VecDeque::new(),
                next_id: 1,
            }),
        }
    }

    /// Appends a request outcome, assigning an id and timestamp, and
    /// evicts from the head back down to the cap.
    pub fn append(&self, record: ApiLogRecord) -> ApiLog {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let log = ApiLog {
            id,
            endpoint: record.endpoint,
            method: record.method,
            response_time: record.response_time,
            status_code: record.status_code,
            timestamp: Utc::now(),
        };

        inner.logs.push_back(log.clone());
        while inner.logs.len() > MAX_LOGS {
            inner.logs.pop_front();
        }
        log
    }

    /// Up to `limit` most recent entries, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<ApiLog> {
        self.inner
            .read()
            .logs
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Rolling totals over the retained window. `uptime` is the inverse
    /// of the error rate, a rough proxy kept for wire compatibility.
    pub fn metrics(&self) -> ApiMetrics {
        let inner = self.inner.read();
        let total = inner.logs.len();
        if total == 0 {
            return ApiMetrics {
                total_requests: 0,
                average_response_time: 0.0,
                error_rate: 0.0,
                uptime: 100.0,
            };
        }

        let time_sum: u64 = inner.logs.iter().map(|log| log.response_time).sum();
        let errors = inner
            .logs
            .iter()
            .filter(|log| log.status_code >= 400)
            .count();

        let error_rate = errors as f64 * 100.0 / total as f64;
        ApiMetrics {
            total_requests: total as u64,
            average_response_time: time_sum as f64 / total as f64,
            error_rate,
            uptime: (100.0 - error_rate).max(0.0),
        }
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}
