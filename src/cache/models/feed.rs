use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// 缓存的上游原始响应，写入后不可变
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub inserted_at: DateTime<Utc>,
    pub payload: Arc<Value>,
}

impl CacheEntry {
    pub fn new(payload: Value, inserted_at: DateTime<Utc>) -> Self {
        Self {
            inserted_at,
            payload: Arc::new(payload),
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.inserted_at > ttl
    }
}
