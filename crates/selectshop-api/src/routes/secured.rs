//! 관리자 전용 확인용 endpoint.
//!
//! 폼 자격 증명 프로토콜과 `RequireRole(ADMIN)` 규칙을 함께 검증할 때 사용합니다.

use axum::Json;

use crate::auth::{AuthErrorBody, CurrentPrincipal, Principal};

/// 인증된 관리자 주체를 그대로 돌려줍니다.
#[utoipa::path(
    post,
    path = "/api/test-secured",
    params(
        ("username" = String, Query, description = "사용자 이름"),
        ("password" = String, Query, description = "비밀번호")
    ),
    responses(
        (status = 200, description = "인증된 주체", body = Principal),
        (status = 401, description = "인증 실패", body = AuthErrorBody),
        (status = 403, description = "관리자 아님", body = AuthErrorBody)
    ),
    tag = "user"
)]
pub async fn test_secured(CurrentPrincipal(principal): CurrentPrincipal) -> Json<Principal> {
    Json(principal)
}
