//! 관심상품 endpoint.
//!
//! 자격 증명이 전혀 없는 요청에는 JSON `null`로 응답합니다.
//! 잘못된 토큰은 보안 파이프라인에서 401로 거절됩니다.

use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use std::sync::Arc;

use selectshop_core::{NewProduct, Product};

use crate::auth::OptionalPrincipal;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::UpdateMyPriceRequest;
use crate::state::AppState;

/// 관심상품 등록.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = NewProduct,
    responses(
        (status = 200, description = "등록된 상품 (토큰이 없으면 null)", body = Product),
        (status = 401, description = "잘못된 토큰")
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Json(product): Json<NewProduct>,
) -> ApiResult<Json<Option<Product>>> {
    let Some(principal) = principal else {
        return Ok(Json(None));
    };
    let created = state.product_service.create(&principal, product).await?;
    Ok(Json(Some(created)))
}

/// 관심상품 목록 (ADMIN은 전체, USER는 본인 소유).
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "상품 목록 (토큰이 없으면 null)", body = Vec<Product>),
        (status = 401, description = "잘못된 토큰")
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    OptionalPrincipal(principal): OptionalPrincipal,
) -> ApiResult<Json<Option<Vec<Product>>>> {
    let Some(principal) = principal else {
        return Ok(Json(None));
    };
    Ok(Json(Some(state.product_service.list(&principal).await?)))
}

/// 희망가 수정.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "상품 ID")),
    request_body = UpdateMyPriceRequest,
    responses(
        (status = 200, description = "수정된 상품 ID (토큰이 없으면 null)", body = i64),
        (status = 401, description = "잘못된 토큰"),
        (status = 404, description = "본인 소유 상품이 아님", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMyPriceRequest>,
) -> ApiResult<Json<Option<i64>>> {
    let Some(principal) = principal else {
        return Ok(Json(None));
    };
    let id = state
        .product_service
        .update_myprice(&principal, id, request.myprice)
        .await?;
    Ok(Json(Some(id)))
}

/// 관심상품 라우터 생성.
pub fn products_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/{id}", put(update_product))
}
