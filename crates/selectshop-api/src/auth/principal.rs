//! 요청 범위 인증 주체.
//!
//! 보안 파이프라인이 인증에 성공하면 [`Principal`]을 요청 extensions에 넣고,
//! 핸들러는 아래 추출기로 꺼내 씁니다. 요청마다 새로 만들어지며 요청 사이에 공유되지 않습니다.
//!
//! ```rust,ignore
//! async fn handler(CurrentPrincipal(principal): CurrentPrincipal) -> String {
//!     format!("Hello, {}!", principal.subject)
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;
use utoipa::ToSchema;

use selectshop_core::{User, UserRole};

use super::error::{AuthError, UnauthenticatedReason};

/// 인증된 주체.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Principal {
    /// 자격증명 레코드 ID
    pub user_id: i64,
    /// 사용자 이름
    pub subject: String,
    /// 역할
    pub role: UserRole,
}

impl Principal {
    /// 저장소 레코드와 역할로 주체 생성.
    pub fn new(user: &User, role: UserRole) -> Self {
        Self {
            user_id: user.id,
            subject: user.username.clone(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// 요구 역할 이상인지 확인.
pub fn require_role(required: UserRole, principal: &Principal) -> Result<(), AuthError> {
    if principal.role.satisfies(required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// 인증된 주체 추출기.
///
/// 파이프라인이 주체를 설치하지 않았으면 401로 거절합니다.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AuthError::Unauthenticated(
                UnauthenticatedReason::MissingCredentials,
            ))
    }
}

/// 선택적 주체 추출기.
///
/// 자격 증명 없이도 접근 가능한 라우트에서 사용합니다.
#[derive(Debug, Clone)]
pub struct OptionalPrincipal(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalPrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalPrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole) -> Principal {
        Principal {
            user_id: 1,
            subject: "kim".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(UserRole::Admin, &principal(UserRole::Admin)).is_ok());
        assert!(require_role(UserRole::User, &principal(UserRole::Admin)).is_ok());
        assert!(require_role(UserRole::User, &principal(UserRole::User)).is_ok());
        assert!(matches!(
            require_role(UserRole::Admin, &principal(UserRole::User)),
            Err(AuthError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_extractors_read_extensions() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        assert!(CurrentPrincipal::from_request_parts(&mut parts, &())
            .await
            .is_err());
        let OptionalPrincipal(none) = OptionalPrincipal::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(none.is_none());

        parts.extensions.insert(principal(UserRole::User));
        let CurrentPrincipal(found) = CurrentPrincipal::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found.subject, "kim");
    }
}
