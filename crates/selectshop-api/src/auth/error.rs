//! 인증/인가 에러.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::jwt::TokenError;

/// 인증되지 않은 이유 (진단용, 응답에는 노출하지 않음).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// 자격 증명이 전혀 없음
    MissingCredentials,
    /// `Bearer ` 마커가 없는 Authorization 헤더
    InvalidScheme,
    /// 토큰 검증 실패
    Token(TokenError),
}

impl UnauthenticatedReason {
    pub fn label(&self) -> &'static str {
        match self {
            UnauthenticatedReason::MissingCredentials => "missing_credentials",
            UnauthenticatedReason::InvalidScheme => "invalid_scheme",
            UnauthenticatedReason::Token(kind) => kind.label(),
        }
    }
}

impl std::fmt::Display for UnauthenticatedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnauthenticatedReason::MissingCredentials => f.write_str("인증 정보가 없습니다"),
            UnauthenticatedReason::InvalidScheme => f.write_str("잘못된 Authorization 헤더 형식"),
            UnauthenticatedReason::Token(kind) => write!(f, "{kind}"),
        }
    }
}

/// 인증/인가 에러.
///
/// `Forbidden`만 403이고 나머지 인증 실패는 모두 같은 401 본문으로 응답합니다.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("인증되지 않은 요청: {0}")]
    Unauthenticated(UnauthenticatedReason),

    #[error("등록된 사용자가 없습니다")]
    UnknownPrincipal,

    #[error("비밀번호가 일치하지 않습니다")]
    BadCredentials,

    #[error("권한이 부족합니다")]
    Forbidden,

    /// 자격 증명을 읽을 수 없는 요청 (본문 과대 등)
    #[error("잘못된 요청: {0}")]
    MalformedRequest(String),

    /// 자격 증명 조회 중 저장소 장애
    #[error("인증 처리 실패: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated(_)
            | AuthError::UnknownPrincipal
            | AuthError::BadCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 메트릭/로그 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated(reason) => reason.label(),
            AuthError::UnknownPrincipal => "unknown_principal",
            AuthError::BadCredentials => "bad_credentials",
            AuthError::Forbidden => "forbidden",
            AuthError::MalformedRequest(_) => "malformed_request",
            AuthError::Internal(_) => "internal",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(kind: TokenError) -> Self {
        AuthError::Unauthenticated(UnauthenticatedReason::Token(kind))
    }
}

/// 인증 실패 응답 본문.
///
/// ```json
/// { "status": 401, "code": "UNAUTHORIZED", "message": "Unauthorized" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthErrorBody {
    /// HTTP 상태 코드
    pub status: u16,
    /// 에러 코드
    pub code: String,
    /// 상태 사유 문구
    pub message: String,
}

impl AuthErrorBody {
    pub fn for_status(status: StatusCode) -> Self {
        let code = match status {
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::FORBIDDEN => "FORBIDDEN",
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            _ => "INTERNAL_ERROR",
        };
        Self {
            status: status.as_u16(),
            code: code.to_string(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(AuthErrorBody::for_status(status))).into_response()
    }
}
