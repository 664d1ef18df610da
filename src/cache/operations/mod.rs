/// 缓存操作

pub mod feed;

pub use feed::FeedCache;
