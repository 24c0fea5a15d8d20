//! 통합 API 에러 응답 타입.
//!
//! 인증 실패는 [`AuthError`]의 고정 본문으로, 그 외 서비스 에러는
//! [`ApiErrorResponse`] 형식으로 응답합니다.

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use selectshop_core::ShopError;

use crate::auth::AuthError;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "DUPLICATE_USERNAME",
///   "message": "중복된 사용자가 존재합니다: kim",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "NOT_FOUND", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// HTTP 메서드
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 타임스탬프 없는 간단한 에러.
    pub fn simple(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            ..Self::new(code, message)
        }
    }

    /// 요청 정보(메서드, 경로)를 추가합니다.
    #[must_use]
    pub fn with_request_info(mut self, method: &Method, uri: &Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(uri.path().to_string());
        self
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// HTTP 경계 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Shop(#[from] ShopError),

    #[error("입력값 검증 실패")]
    Validation(#[from] ValidationErrors),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(err) => err.status(),
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Shop(err) => match err {
                ShopError::DuplicateUsername(_)
                | ShopError::DuplicateEmail(_)
                | ShopError::AdminTokenMismatch
                | ShopError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ShopError::NotFound(_) => StatusCode::NOT_FOUND,
                ShopError::Search(_) => StatusCode::BAD_GATEWAY,
                ShopError::Config(_) | ShopError::Database(_) | ShopError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Auth(_) => "AUTH_ERROR",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Shop(err) => match err {
                ShopError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
                ShopError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
                ShopError::AdminTokenMismatch => "ADMIN_TOKEN_MISMATCH",
                ShopError::InvalidInput(_) => "INVALID_INPUT",
                ShopError::NotFound(_) => "NOT_FOUND",
                ShopError::Search(_) => "SEARCH_ERROR",
                ShopError::Database(_) => "DB_ERROR",
                ShopError::Config(_) | ShopError::Internal(_) => "INTERNAL_ERROR",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match self {
            ApiError::Auth(err) => return err.into_response(),
            ApiError::Validation(errors) => ApiErrorResponse::with_details(
                code,
                "입력값 검증 실패",
                serde_json::to_value(&errors).unwrap_or(Value::Null),
            ),
            ApiError::Shop(err) if status.is_server_error() => {
                // 내부 사유는 로그에만 남김
                error!(error = %err, "Request failed");
                ApiErrorResponse::new(code, "요청을 처리할 수 없습니다")
            }
            ApiError::Shop(err) => ApiErrorResponse::new(code, err.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
