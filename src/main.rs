use std::net::{IpAddr, SocketAddr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tweet_feed::{AppState, config::Config, feed::FeedCoordinator, routes};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    if config.credentials().is_none() {
        tracing::warn!(
            "Twitter credentials are incomplete: set TWITTER_CONSUMER_KEY, TWITTER_CONSUMER_SECRET, \
             TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_TOKEN_SECRET. Feeds will be empty."
        );
    }
    tracing::info!("Caching upstream responses for {}s", config.cache_lifetime_secs);

    // 客户端在第一次请求时才创建
    let feed = FeedCoordinator::from_config(&config);
    let state = AppState::new(config.clone(), feed);

    let router = routes::create_router(state);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}
