use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::model::{FeedRequest, GetListsRequest};
use crate::AppState;
use crate::error::NotFound;
use crate::utils::success_to_api_response;

#[axum::debug_handler]
pub async fn feed(
    State(state): State<AppState>,
    Json(req): Json<FeedRequest>,
) -> Result<impl IntoResponse, NotFound> {
    let tweets = state.feed.handle(&req.into()).await?;
    Ok((StatusCode::OK, success_to_api_response(tweets)))
}

#[axum::debug_handler]
pub async fn get_lists(
    State(state): State<AppState>,
    Json(req): Json<GetListsRequest>,
) -> impl IntoResponse {
    let username = req.username.unwrap_or_default();
    let lists = state.feed.lists(&username).await;
    (StatusCode::OK, success_to_api_response(lists))
}

pub async fn health() -> &'static str {
    "ok"
}
