// 缓存模块
// 进程内的 TTL 缓存，按规范化后的 (endpoint, 参数) 键共享上游响应

pub mod keys;
pub mod models;
pub mod operations;

pub use keys::{CacheKey, feed_cache_key};
pub use models::CacheEntry;
pub use operations::FeedCache;
