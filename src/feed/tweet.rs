use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Twitter v1.1 的 created_at 格式，例如 `Wed Oct 10 20:19:24 +0000 2018`
const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// 规范化后的推文
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tweet {
    pub id: String,
    /// 完整文本（full_text），不是截断后的默认 text
    pub text: String,
    pub author: String,
    pub created_at: Option<DateTime<Utc>>,
    pub raw: Value,
}

impl Tweet {
    pub fn from_status(status: &Value) -> Self {
        let id = match (status.get("id_str"), status.get("id")) {
            (Some(Value::String(id)), _) => id.clone(),
            (_, Some(Value::Number(id))) => id.to_string(),
            (_, Some(Value::String(id))) => id.clone(),
            _ => String::new(),
        };
        let text = status
            .get("full_text")
            .or_else(|| status.get("text"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let author = status
            .pointer("/user/screen_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let created_at = status
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_str(s, TWITTER_DATE_FORMAT).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            id,
            text,
            author,
            created_at,
            raw: status.clone(),
        }
    }
}

/// 展开上游响应：搜索结果取 `statuses` 字段，其余直接当作推文数组
pub fn normalize(payload: &Value) -> Vec<Tweet> {
    let statuses = match payload {
        Value::Object(envelope) => envelope.get("statuses"),
        other => Some(other),
    };

    statuses
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|v| v.is_object()).map(Tweet::from_status).collect())
        .unwrap_or_default()
}

/// 账号拥有的列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedList {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// 解析 lists/ownerships 响应，字段不全的条目直接跳过
pub fn owned_lists(payload: &Value) -> Vec<OwnedList> {
    let Some(lists) = payload.get("lists").and_then(Value::as_array) else {
        return Vec::new();
    };

    lists
        .iter()
        .filter_map(|list| {
            let id = match (list.get("id_str"), list.get("id")) {
                (Some(Value::String(id)), _) => id.clone(),
                (_, Some(Value::Number(id))) => id.to_string(),
                _ => return None,
            };
            Some(OwnedList {
                id,
                name: list.get("name")?.as_str()?.to_string(),
                slug: list.get("slug")?.as_str()?.to_string(),
            })
        })
        .collect()
}
