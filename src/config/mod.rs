use std::env;
use std::time::Duration;

const DEFAULT_CACHE_LIFETIME_SECS: u64 = 30;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TWITTER_API_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Twitter 用户上下文凭证（consumer key/secret + access token/secret）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
    pub cache_lifetime_secs: u64,
    pub upstream_timeout_secs: u64,
    pub twitter_api_base_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name))
    }

    /// 从任意变量来源构建配置，缺失的变量使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let var = |name: &str| match lookup(name) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(e),
        };

        let cache_lifetime_secs = var("CACHE_LIFETIME")?
            .and_then(|v| v.trim().trim_end_matches('s').parse::<u64>().ok())
            .unwrap_or(DEFAULT_CACHE_LIFETIME_SECS);
        let upstream_timeout_secs = var("UPSTREAM_TIMEOUT")?
            .and_then(|v| v.trim().trim_end_matches('s').parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Ok(Config {
            consumer_key: var("TWITTER_CONSUMER_KEY")?,
            consumer_secret: var("TWITTER_CONSUMER_SECRET")?,
            access_token: var("TWITTER_ACCESS_TOKEN")?,
            access_token_secret: var("TWITTER_ACCESS_TOKEN_SECRET")?,
            cache_lifetime_secs,
            upstream_timeout_secs,
            twitter_api_base_url: var("TWITTER_API_BASE_URL")?
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_TWITTER_API_BASE_URL.to_string()),
            server_host: var("SERVER_HOST")?.unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: var("SERVER_PORT")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_base_uri: var("API_BASE_URI")?
                .map(|uri| normalize_base_uri(&uri))
                .unwrap_or_else(|| "/api".to_string()),
        })
    }

    /// 四项凭证全部非空时才返回
    pub fn credentials(&self) -> Option<Credentials> {
        let field = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Some(Credentials {
            consumer_key: field(&self.consumer_key)?,
            consumer_secret: field(&self.consumer_secret)?,
            access_token: field(&self.access_token)?,
            access_token_secret: field(&self.access_token_secret)?,
        })
    }

    pub fn cache_lifetime(&self) -> Duration {
        Duration::from_secs(self.cache_lifetime_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

/// 路由前缀必须以 `/` 开头，末尾不带 `/`；空值表示挂在根路径
fn normalize_base_uri(uri: &str) -> String {
    let trimmed = uri.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
