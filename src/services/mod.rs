pub mod request_log;
pub mod storage;

pub use request_log::RequestLog;
pub use storage::{MemStorage, StoreError};
