/// 缓存键模块

pub mod feed_keys;

pub use feed_keys::{CacheKey, feed_cache_key};
