use std::collections::BTreeMap;
use std::fmt;

/// 上游资源路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListStatuses,
    UserTimeline,
    SearchByAuthorAndTag,
    SearchByTag,
    /// 仅供 get-lists 使用，分类器不会选中
    ListOwnerships,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ListStatuses => "lists/statuses",
            Endpoint::UserTimeline => "statuses/user_timeline",
            Endpoint::SearchByAuthorAndTag | Endpoint::SearchByTag => "search/tweets",
            Endpoint::ListOwnerships => "lists/ownerships",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Text(String),
    Int(u32),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value)
    }
}

/// 查询参数，按键名有序存放，保证相同的逻辑查询序列化结果一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UpstreamParameters(BTreeMap<&'static str, ParamValue>);

impl UpstreamParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// 按 RFC 3986 编码后的 query string，键按字典序排列
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k),
                    urlencoding::encode(&v.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_is_sorted_and_encoded() {
        let params = UpstreamParameters::new()
            .with("q", "from:jack #rust #async")
            .with("count", 5u32)
            .with("tweet_mode", "extended");

        assert_eq!(
            params.to_query_string(),
            "count=5&q=from%3Ajack%20%23rust%20%23async&tweet_mode=extended"
        );
    }

    #[test]
    fn both_search_variants_share_a_path() {
        assert_eq!(Endpoint::SearchByTag.path(), Endpoint::SearchByAuthorAndTag.path());
        assert_ne!(Endpoint::UserTimeline.path(), Endpoint::ListStatuses.path());
    }
}
