/// 缓存数据模型

pub mod feed;

pub use feed::CacheEntry;
