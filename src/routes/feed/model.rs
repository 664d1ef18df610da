use serde::Deserialize;

use crate::feed::QueryRequest;
use crate::feed::query::DEFAULT_LIMIT;

/// 前端 widget 提交的 feed 过滤条件
#[derive(Debug, Default, Deserialize)]
pub struct FeedRequest {
    pub account: Option<String>,
    pub hashtag: Option<String>,
    pub list: Option<String>,
    pub limit: Option<i64>,
}

impl From<FeedRequest> for QueryRequest {
    fn from(req: FeedRequest) -> Self {
        // 非正数按未设置处理
        let limit = req
            .limit
            .filter(|l| *l > 0)
            .map(|l| u32::try_from(l).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_LIMIT);

        QueryRequest {
            account: req.account,
            hashtag: req.hashtag,
            list: req.list,
            limit,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GetListsRequest {
    pub username: Option<String>,
}
