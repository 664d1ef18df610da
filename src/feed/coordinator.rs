use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::OnceCell;

use super::query::{QueryRequest, classify};
use super::tweet::{OwnedList, Tweet, normalize, owned_lists};
use crate::cache::{CacheKey, FeedCache, feed_cache_key};
use crate::config::Config;
use crate::error::{FeedError, NotFound};
use crate::twitter::{Endpoint, TwitterClient, Upstream, UpstreamError, UpstreamParameters};

type UpstreamFactory = Box<dyn Fn() -> Result<Arc<dyn Upstream>, UpstreamError> + Send + Sync>;

/// 首次使用时才构建的上游客户端，之后整个进程复用同一个实例
pub struct LazyUpstream {
    factory: UpstreamFactory,
    client: OnceCell<Arc<dyn Upstream>>,
}

impl LazyUpstream {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Upstream>, UpstreamError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            client: OnceCell::new(),
        }
    }

    /// 凭证不完整时每次获取都会失败，feed 降级为空
    pub fn from_config(config: &Config) -> Self {
        let credentials = config.credentials();
        let base_url = config.twitter_api_base_url.clone();
        let timeout = config.upstream_timeout();

        Self::new(move || {
            let credentials = credentials.clone().ok_or(UpstreamError::MissingCredentials)?;
            let client = TwitterClient::new(credentials, base_url.clone(), timeout)?;
            tracing::info!("Twitter client initialized for {}", base_url);
            Ok(Arc::new(client) as Arc<dyn Upstream>)
        })
    }

    /// 并发的首次调用只会构建一次；构建失败不会被缓存，下次重试
    pub async fn get(&self) -> Result<&Arc<dyn Upstream>, UpstreamError> {
        self.client
            .get_or_try_init(|| async { (self.factory)() })
            .await
    }
}

/// 同一缓存键的回源结果，成功或失败都由所有等待者共享
type Flight = Arc<OnceCell<Result<Arc<Value>, Arc<UpstreamError>>>>;

/// feed 请求协调器：分类 → 查缓存 → 回源 → 写缓存 → 规范化
pub struct FeedCoordinator {
    cache: FeedCache,
    upstream: LazyUpstream,
    in_flight: Mutex<HashMap<CacheKey, Flight>>,
}

impl FeedCoordinator {
    pub fn new(cache: FeedCache, upstream: LazyUpstream) -> Self {
        Self {
            cache,
            upstream,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            FeedCache::new(config.cache_lifetime()),
            LazyUpstream::from_config(config),
        )
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// 处理一次 feed 请求
    ///
    /// 只有账号为空时返回 `Err(NotFound)`；分类失败和上游失败都记录日志后返回空列表。
    pub async fn handle(&self, request: &QueryRequest) -> Result<Vec<Tweet>, NotFound> {
        match self.try_handle(request).await {
            Ok(tweets) => Ok(tweets),
            Err(FeedError::InvalidAccount) => Err(NotFound),
            Err(FeedError::InvalidQuery) => {
                tracing::debug!("No endpoint for request {:?}, returning empty feed", request);
                Ok(Vec::new())
            }
            Err(FeedError::Upstream(e)) => {
                tracing::error!(kind = e.kind(), "Failed to fetch tweets: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn try_handle(&self, request: &QueryRequest) -> Result<Vec<Tweet>, FeedError> {
        let (endpoint, params) = classify(request)?;
        let payload = self.fetch(endpoint, &params).await?;
        Ok(normalize(&payload))
    }

    /// 查询账号拥有的列表，任何失败都返回空
    pub async fn lists(&self, username: &str) -> Vec<OwnedList> {
        let username = username.trim().trim_start_matches('@');
        if username.is_empty() {
            return Vec::new();
        }

        let params = UpstreamParameters::new().with("screen_name", username);
        match self.fetch(Endpoint::ListOwnerships, &params).await {
            Ok(payload) => owned_lists(&payload),
            Err(e) => {
                tracing::error!(kind = e.kind(), "Failed to fetch lists for {}: {}", username, e);
                Vec::new()
            }
        }
    }

    async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &UpstreamParameters,
    ) -> Result<Arc<Value>, Arc<UpstreamError>> {
        let key = feed_cache_key(endpoint, params);
        if let Some(payload) = self.cache.lookup(&key) {
            return Ok(payload);
        }

        let flight = self.join_flight(&key);
        let outcome = flight
            .get_or_init(|| async {
                // 上一轮可能刚写入缓存
                if let Some(payload) = self.cache.lookup(&key) {
                    return Ok(payload);
                }

                tracing::debug!("Cache miss, fetching {}", key);
                self.fetch_upstream(endpoint, params)
                    .await
                    .map(|payload| self.cache.store(key.clone(), payload))
                    .map_err(Arc::new)
            })
            .await
            .clone();

        self.leave_flight(&key, &flight);
        outcome
    }

    async fn fetch_upstream(
        &self,
        endpoint: Endpoint,
        params: &UpstreamParameters,
    ) -> Result<Value, UpstreamError> {
        let client = self.upstream.get().await?;
        client.fetch(endpoint, params).await
    }

    fn join_flight(&self, key: &CacheKey) -> Flight {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key.clone())
            .or_default()
            .clone()
    }

    /// 结果落定后移除，失败的键下一次请求会重新回源
    fn leave_flight(&self, key: &CacheKey, flight: &Flight) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if in_flight.get(key).is_some_and(|current| Arc::ptr_eq(current, flight)) {
            in_flight.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::join_all;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Responder = dyn Fn(Endpoint, &UpstreamParameters) -> Result<Value, UpstreamError> + Send + Sync;

    struct FakeUpstream {
        calls: AtomicUsize,
        latency: Duration,
        responder: Box<Responder>,
    }

    #[async_trait::async_trait]
    impl Upstream for FakeUpstream {
        async fn fetch(
            &self,
            endpoint: Endpoint,
            params: &UpstreamParameters,
        ) -> Result<Value, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            (self.responder)(endpoint, params)
        }
    }

    struct Harness {
        coordinator: FeedCoordinator,
        upstream: Arc<FakeUpstream>,
        builds: Arc<AtomicUsize>,
    }

    fn harness<F>(responder: F) -> Harness
    where
        F: Fn(Endpoint, &UpstreamParameters) -> Result<Value, UpstreamError> + Send + Sync + 'static,
    {
        slow_harness(Duration::from_millis(5), responder)
    }

    fn slow_harness<F>(latency: Duration, responder: F) -> Harness
    where
        F: Fn(Endpoint, &UpstreamParameters) -> Result<Value, UpstreamError> + Send + Sync + 'static,
    {
        let upstream = Arc::new(FakeUpstream {
            calls: AtomicUsize::new(0),
            latency,
            responder: Box::new(responder),
        });
        let builds = Arc::new(AtomicUsize::new(0));

        let shared = Arc::clone(&upstream);
        let counter = Arc::clone(&builds);
        let lazy = LazyUpstream::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::clone(&shared) as Arc<dyn Upstream>)
        });

        Harness {
            coordinator: FeedCoordinator::new(FeedCache::new(Duration::from_secs(30)), lazy),
            upstream,
            builds,
        }
    }

    fn timeline(n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| json!({ "id_str": i.to_string(), "text": "cut…", "full_text": format!("tweet number {}", i) }))
                .collect(),
        )
    }

    #[tokio::test]
    async fn timeline_items_use_full_text() {
        let h = harness(|endpoint, params| {
            assert_eq!(endpoint, Endpoint::UserTimeline);
            assert_eq!(params.get("screen_name").unwrap().to_string(), "jack");
            Ok(timeline(3))
        });

        let request = QueryRequest {
            account: Some("jack".into()),
            hashtag: Some(String::new()),
            list: Some(String::new()),
            limit: 3,
        };
        let tweets = h.coordinator.handle(&request).await.unwrap();

        assert_eq!(tweets.len(), 3);
        for (i, tweet) in tweets.iter().enumerate() {
            assert_eq!(tweet.text, format!("tweet number {}", i));
        }
    }

    #[tokio::test]
    async fn repeated_requests_within_ttl_hit_upstream_once() {
        let h = harness(|_, _| Ok(timeline(1)));
        let request = QueryRequest::account("jack");

        for _ in 0..5 {
            assert_eq!(h.coordinator.handle(&request).await.unwrap().len(), 1);
        }

        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hashtag_search_is_cached_under_its_query() {
        let h = harness(|_, _| Ok(json!({ "statuses": [] })));
        let request = QueryRequest {
            account: Some(String::new()),
            hashtag: Some("golang".into()),
            list: None,
            limit: 5,
        };

        assert!(h.coordinator.handle(&request).await.unwrap().is_empty());

        let key = feed_cache_key(
            Endpoint::SearchByTag,
            &UpstreamParameters::new()
                .with("q", "#golang")
                .with("count", 5u32)
                .with("tweet_mode", "extended"),
        );
        assert!(h.coordinator.cache().lookup(&key).is_some());
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_empty_and_is_not_cached() {
        let h = harness(|_, _| Err(UpstreamError::RateLimited));
        let request = QueryRequest::account("jack");

        assert_eq!(h.coordinator.handle(&request).await, Ok(Vec::new()));
        assert!(h.coordinator.cache().is_empty());

        assert_eq!(h.coordinator.handle(&request).await, Ok(Vec::new()));
        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn blank_account_is_not_found() {
        let h = harness(|_, _| Ok(timeline(1)));
        assert_eq!(h.coordinator.handle(&QueryRequest::account("  ")).await, Err(NotFound));
        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_filters_yield_empty_without_fetching() {
        let h = harness(|_, _| Ok(timeline(1)));
        assert_eq!(h.coordinator.handle(&QueryRequest::default()).await, Ok(Vec::new()));
        assert_eq!(h.builds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_cold_requests_share_one_fetch() {
        let h = harness(|_, _| Ok(timeline(2)));
        let request = QueryRequest::account("jack");

        let results = join_all((0..8).map(|_| h.coordinator.handle(&request))).await;

        assert!(results.iter().all(|r| r.as_ref().map(Vec::len) == Ok(2)));
        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 1);
        assert!(h.coordinator.in_flight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_failures_share_one_upstream_call() {
        let latency = Duration::from_millis(100);
        let h = slow_harness(latency, |_, _| Err(UpstreamError::Timeout));
        let request = QueryRequest::account("jack");

        let started = std::time::Instant::now();
        let results = join_all((0..5).map(|_| h.coordinator.handle(&request))).await;
        let elapsed = started.elapsed();

        assert!(results.iter().all(|r| r.as_ref().map(Vec::is_empty) == Ok(true)));
        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 1);
        assert!(elapsed < latency * 2, "took {:?}", elapsed);
        assert!(h.coordinator.in_flight.lock().unwrap().is_empty());

        // 失败结果不保留，下一次请求重新回源
        h.coordinator.handle(&request).await.unwrap();
        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn equivalent_requests_share_one_cache_entry() {
        let h = harness(|_, _| Ok(timeline(1)));

        h.coordinator.handle(&QueryRequest::account(" @jack ")).await.unwrap();
        h.coordinator.handle(&QueryRequest::account("jack")).await.unwrap();
        h.coordinator.handle(&QueryRequest::hashtag("golang")).await.unwrap();
        h.coordinator.handle(&QueryRequest::hashtag("#golang")).await.unwrap();

        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.coordinator.cache().len(), 2);
    }

    #[tokio::test]
    async fn client_is_built_once_for_distinct_keys() {
        let latency = Duration::from_millis(100);
        let h = slow_harness(latency, |_, _| Ok(timeline(1)));
        let requests: Vec<_> = ["a", "b", "c", "d"].iter().map(|a| QueryRequest::account(a)).collect();

        let started = std::time::Instant::now();
        join_all(requests.iter().map(|r| h.coordinator.handle(r))).await;
        let elapsed = started.elapsed();

        // 不同的键并行回源
        assert!(elapsed < latency * 3, "took {:?}", elapsed);
        assert_eq!(h.builds.load(Ordering::SeqCst), 1);
        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 4);
        assert_eq!(h.coordinator.cache().len(), 4);
    }

    #[tokio::test]
    async fn lists_are_fetched_and_cached() {
        let h = harness(|endpoint, params| {
            assert_eq!(endpoint, Endpoint::ListOwnerships);
            assert_eq!(params.get("screen_name").unwrap().to_string(), "acme");
            Ok(json!({ "lists": [{ "id_str": "1", "name": "Press", "slug": "press" }] }))
        });

        let lists = h.coordinator.lists("@acme").await;
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].slug, "press");

        h.coordinator.lists("acme").await;
        assert_eq!(h.upstream.calls.load(Ordering::SeqCst), 1);
        assert!(h.coordinator.lists("   ").await.is_empty());
    }

    #[tokio::test]
    async fn missing_credentials_degrade_to_empty() {
        let config = Config::from_lookup(|_| Err(std::env::VarError::NotPresent)).unwrap();
        let coordinator = FeedCoordinator::from_config(&config);

        assert_eq!(coordinator.handle(&QueryRequest::account("jack")).await, Ok(Vec::new()));
        assert!(coordinator.lists("jack").await.is_empty());
        assert!(coordinator.cache().is_empty());
    }
}
