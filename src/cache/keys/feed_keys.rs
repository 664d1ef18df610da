use std::fmt;

use crate::twitter::{Endpoint, UpstreamParameters};

/// 规范化的缓存键：资源路径 + 有序 query string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 生成 feed 缓存键
pub fn feed_cache_key(endpoint: Endpoint, params: &UpstreamParameters) -> CacheKey {
    CacheKey(format!("{}?{}", endpoint.path(), params.to_query_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_does_not_change_the_key() {
        let a = UpstreamParameters::new()
            .with("screen_name", "jack")
            .with("count", 3u32)
            .with("tweet_mode", "extended");
        let b = UpstreamParameters::new()
            .with("tweet_mode", "extended")
            .with("count", 3u32)
            .with("screen_name", "jack");

        assert_eq!(
            feed_cache_key(Endpoint::UserTimeline, &a),
            feed_cache_key(Endpoint::UserTimeline, &b)
        );
        assert_eq!(
            feed_cache_key(Endpoint::UserTimeline, &a).as_str(),
            "statuses/user_timeline?count=3&screen_name=jack&tweet_mode=extended"
        );
    }

    #[test]
    fn endpoint_is_part_of_the_key() {
        let params = UpstreamParameters::new().with("count", 3u32);
        assert_ne!(
            feed_cache_key(Endpoint::UserTimeline, &params),
            feed_cache_key(Endpoint::ListStatuses, &params)
        );
    }
}
