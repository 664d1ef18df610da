use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use thiserror::Error;

use crate::twitter::UpstreamError;
use crate::utils::{error_codes, error_to_api_response};

/// feed 请求内部的错误分类
///
/// 只有 `InvalidAccount` 会以 [`NotFound`] 的形式离开协调器，其余都降级为空结果。
#[derive(Debug, Error)]
pub enum FeedError {
    /// 账号去除空白后为空
    #[error("account is empty")]
    InvalidAccount,

    /// 过滤条件不足以确定任何 endpoint
    #[error("no endpoint matches the given filters")]
    InvalidQuery,

    /// 同一键的并发请求共享同一个上游错误
    #[error(transparent)]
    Upstream(#[from] Arc<UpstreamError>),
}

/// 账号无效，对应 404
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "not found".to_string()),
        )
            .into_response()
    }
}
