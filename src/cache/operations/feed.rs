use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;

use crate::cache::keys::CacheKey;
use crate::cache::models::CacheEntry;

/// 进程内 feed 缓存
///
/// 所有请求共享同一份缓存，过期条目在下一次查询时惰性删除，没有后台清理。
pub struct FeedCache {
    ttl: TimeDelta,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // 持锁期间不会 panic，中毒时直接沿用内部数据
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn lookup(&self, key: &CacheKey) -> Option<Arc<Value>> {
        self.lookup_at(key, Utc::now())
    }

    /// 查询缓存，过期条目视为未命中并顺带删除
    pub fn lookup_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Arc<Value>> {
        let mut entries = self.entries();
        if entries.get(key)?.is_stale(now, self.ttl) {
            tracing::debug!("Cache entry expired: {}", key);
            entries.remove(key);
            return None;
        }

        tracing::debug!("Cache hit: {}", key);
        entries.get(key).map(|entry| Arc::clone(&entry.payload))
    }

    pub fn store(&self, key: CacheKey, payload: Value) -> Arc<Value> {
        self.store_at(key, payload, Utc::now())
    }

    pub fn store_at(&self, key: CacheKey, payload: Value, now: DateTime<Utc>) -> Arc<Value> {
        let entry = CacheEntry::new(payload, now);
        let payload = Arc::clone(&entry.payload);

        let mut entries = self.entries();
        // 顺带清掉已过期的其他键，避免一次性查询的键常驻内存
        let ttl = self.ttl;
        entries.retain(|_, e| !e.is_stale(now, ttl));
        entries.insert(key, entry);
        payload
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
