use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;
use crate::middleware::log_errors;

pub mod feed;

// widget 相关路由
fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/feed", post(feed::feed))
        .route("/get-lists", post(feed::get_lists))
        .route("/health", get(feed::health))
}

/// 创建主路由，挂载在配置的前缀下
pub fn create_router(state: AppState) -> Router {
    let base = state.config.api_base_uri.trim_end_matches('/').to_string();
    let router = if base.is_empty() {
        feed_routes()
    } else {
        Router::new().nest(&base, feed_routes())
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
