use config::Config;
use feed::FeedCoordinator;
use std::sync::Arc;

pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod middleware;
pub mod routes;
pub mod twitter;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub feed: Arc<FeedCoordinator>,
}

impl AppState {
    pub fn new(config: Config, feed: FeedCoordinator) -> Self {
        Self {
            config,
            feed: Arc::new(feed),
        }
    }
}
