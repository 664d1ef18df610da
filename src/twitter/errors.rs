use reqwest::StatusCode;
use thiserror::Error;

/// 调用 Twitter API 时可能出现的错误
///
/// 对调用方而言这些都是同一种"上游失败"，细分只用于日志。
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// 未配置完整的四项凭证
    #[error("Twitter credentials are not configured")]
    MissingCredentials,

    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    /// HTTP 429
    #[error("Rate limit exceeded")]
    RateLimited,

    /// HTTP 401 / 403
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// HTTP 400 / 404
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Twitter API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Unauthorized(body),
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                UpstreamError::InvalidParameters(body)
            }
            _ => UpstreamError::Api { status, body },
        }
    }

    /// 日志用的简短分类名
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::MissingCredentials => "missing_credentials",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Timeout => "timeout",
            UpstreamError::RateLimited => "rate_limited",
            UpstreamError::Unauthorized(_) => "unauthorized",
            UpstreamError::InvalidParameters(_) => "invalid_parameters",
            UpstreamError::Api { .. } => "api",
            UpstreamError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(e)
        }
    }
}
