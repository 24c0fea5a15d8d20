//! 회원가입/로그인 endpoint.
//!
//! - `POST /api/user/signup`: JSON 회원가입
//! - `POST /api/user/login`: 폼 자격 증명(쿼리/urlencoded) 또는 JSON 본문으로 로그인
//!
//! 로그인 성공 시 토큰은 `Authorization` 응답 헤더로, 본문은 `"success"`로 응답합니다.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use selectshop_core::ShopError;

use crate::auth::{AuthError, AuthErrorBody, OptionalPrincipal, UnauthenticatedReason};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::{SignupRequest, SignupResponse};
use crate::state::AppState;

/// JSON 로그인 요청.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 회원가입.
#[utoipa::path(
    post,
    path = "/api/user/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "가입 성공", body = SignupResponse),
        (status = 400, description = "중복/검증 실패/관리자 암호 불일치", body = ApiErrorResponse)
    ),
    tag = "user"
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    let created = state.user_service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 로그인.
///
/// 폼 자격 증명이 있으면 보안 파이프라인이 이미 주체를 설치했으므로 토큰만 발급합니다.
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    params(
        ("username" = Option<String>, Query, description = "폼 자격 증명: 사용자 이름"),
        ("password" = Option<String>, Query, description = "폼 자격 증명: 비밀번호")
    ),
    responses(
        (status = 200, description = "로그인 성공 (Authorization 헤더에 토큰)", body = String,
            headers(("Authorization" = String, description = "Bearer 토큰"))),
        (status = 401, description = "인증 실패", body = AuthErrorBody)
    ),
    tag = "user"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    OptionalPrincipal(principal): OptionalPrincipal,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let token = match principal {
        Some(principal) => state.user_service.issue_token(&principal)?,
        None => {
            if body.iter().all(u8::is_ascii_whitespace) {
                let missing = AuthError::Unauthenticated(UnauthenticatedReason::MissingCredentials);
                return Err(missing.into());
            }
            let request: LoginRequest = serde_json::from_slice(&body).map_err(ShopError::from)?;
            state
                .user_service
                .login(&request.username, &request.password)
                .await?
        }
    };

    Ok(([(AUTHORIZATION, token)], "success"))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}
