//! 쇼핑 검색 프록시 endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::IntoParams;

use selectshop_core::ShopError;
use selectshop_search::ItemDto;

use crate::auth::CurrentPrincipal;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 검색 쿼리.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// 검색어
    pub query: String,
}

/// 쇼핑 검색.
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "검색 결과", body = Vec<ItemDto>),
        (status = 400, description = "검색어 없음", body = ApiErrorResponse),
        (status = 401, description = "인증 필요"),
        (status = 502, description = "검색 API 오류", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "search"
)]
pub async fn search_items(
    State(state): State<Arc<AppState>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(SearchQuery { query }): Query<SearchQuery>,
) -> ApiResult<Json<Vec<ItemDto>>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ShopError::InvalidInput("query must not be empty".to_string()).into());
    }

    debug!(subject = %principal.subject, query, "Shopping search");
    let items = state.search.search(query).await.map_err(ShopError::from)?;
    Ok(Json(items))
}
