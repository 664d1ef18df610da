use crate::error::FeedError;
use crate::twitter::{Endpoint, UpstreamParameters};

pub const DEFAULT_LIMIT: u32 = 3;
/// 上游单页最大条数
pub const MAX_LIMIT: u32 = 200;

/// 一次 feed 请求的过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub account: Option<String>,
    pub hashtag: Option<String>,
    pub list: Option<String>,
    pub limit: u32,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            account: None,
            hashtag: None,
            list: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryRequest {
    pub fn account(account: &str) -> Self {
        Self {
            account: Some(account.to_string()),
            ..Self::default()
        }
    }

    pub fn hashtag(hashtag: &str) -> Self {
        Self {
            hashtag: Some(hashtag.to_string()),
            ..Self::default()
        }
    }

    pub fn with_hashtag(mut self, hashtag: &str) -> Self {
        self.hashtag = Some(hashtag.to_string());
        self
    }

    pub fn with_list(mut self, list: &str) -> Self {
        self.list = Some(list.to_string());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// 拆分空白分隔的标签，缺少 `#` 的补上，再用单个空格连接
pub fn normalize_hashtags(input: &str) -> String {
    input
        .split_whitespace()
        .map(|tag| {
            if tag.starts_with('#') {
                tag.to_string()
            } else {
                format!("#{}", tag)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 列表名转 slug：小写，连续的非字母数字字符合并为一个 `-`
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// 由过滤条件决定 endpoint 和参数，按顺序第一个匹配的规则生效
///
/// 账号给出但为空（且没有可用的标签）时返回 `InvalidAccount`；
/// 什么条件都没有时返回 `InvalidQuery`。
pub fn classify(request: &QueryRequest) -> Result<(Endpoint, UpstreamParameters), FeedError> {
    let account = request
        .account
        .as_deref()
        .map(|a| a.trim().trim_start_matches('@').trim());
    let hashtag = request
        .hashtag
        .as_deref()
        .map(normalize_hashtags)
        .filter(|h| !h.is_empty());
    let list = request
        .list
        .as_deref()
        .map(slugify)
        .filter(|l| !l.is_empty());

    if account.is_some_and(str::is_empty) && hashtag.is_none() {
        return Err(FeedError::InvalidAccount);
    }
    let account = account.filter(|a| !a.is_empty());
    // 0 视为未设置
    let count = match request.limit {
        0 => DEFAULT_LIMIT,
        limit => limit.min(MAX_LIMIT),
    };

    let (endpoint, params) = match (account, hashtag, list) {
        (Some(account), _, Some(list)) => {
            let params = if list.chars().all(|c| c.is_ascii_digit()) {
                UpstreamParameters::new().with("list_id", list)
            } else {
                UpstreamParameters::new()
                    .with("slug", list)
                    .with("owner_screen_name", account)
            };
            (Endpoint::ListStatuses, params)
        }
        (Some(account), None, None) => (
            Endpoint::UserTimeline,
            UpstreamParameters::new().with("screen_name", account),
        ),
        (Some(account), Some(hashtag), None) => (
            Endpoint::SearchByAuthorAndTag,
            UpstreamParameters::new().with("q", format!("from:{} {}", account, hashtag)),
        ),
        (None, Some(hashtag), _) => (
            Endpoint::SearchByTag,
            UpstreamParameters::new().with("q", hashtag),
        ),
        (None, None, _) => return Err(FeedError::InvalidQuery),
    };

    Ok((endpoint, params.with("count", count).with("tweet_mode", "extended")))
}
