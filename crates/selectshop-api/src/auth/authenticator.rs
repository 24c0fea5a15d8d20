//! 요청 인증기.
//!
//! 요청의 자격 증명으로 [`Principal`]을 만들거나 거절합니다. 두 가지 프로토콜을 지원합니다.
//!
//! 1. **Bearer 토큰**: `Authorization: Bearer <jwt>` 검증 후 subject로 사용자 조회
//! 2. **폼 자격 증명**: `username`/`password` 파라미터로 사용자 조회 후 다이제스트 비교

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use selectshop_core::User;

use super::error::{AuthError, UnauthenticatedReason};
use super::jwt::{TokenCodec, BEARER_PREFIX};
use super::password::verify_password;
use super::principal::Principal;
use crate::repository::UserStore;

/// 폼/쿼리 파라미터로 전달된 자격 증명.
#[derive(Debug, Default, Deserialize)]
pub struct FormCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl FormCredentials {
    /// 두 값이 모두 있을 때만 반환.
    pub fn complete(self) -> Option<(String, String)> {
        match (self.username, self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

/// Authorization 헤더 값에서 원시 토큰을 꺼냅니다.
///
/// 값이 없거나 공백뿐이면 `MissingCredentials`, 마커가 없으면 `InvalidScheme`.
/// 마커 검사를 통과하면 정확히 7글자를 잘라냅니다.
pub fn resolve_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = match header {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            return Err(AuthError::Unauthenticated(
                UnauthenticatedReason::MissingCredentials,
            ))
        }
    };

    if !value.starts_with(BEARER_PREFIX) {
        return Err(AuthError::Unauthenticated(UnauthenticatedReason::InvalidScheme));
    }

    Ok(&value[BEARER_PREFIX.len()..])
}

/// 요청 인증기.
#[derive(Clone)]
pub struct Authenticator {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { codec, users }
    }

    /// Bearer 프로토콜 (현재 시각 기준).
    pub async fn authenticate_bearer(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        self.authenticate_bearer_at(header, chrono::Utc::now().timestamp())
            .await
    }

    /// Bearer 프로토콜.
    ///
    /// 역할은 저장소가 아니라 토큰 클레임에서 가져옵니다.
    pub async fn authenticate_bearer_at(
        &self,
        header: Option<&str>,
        now: i64,
    ) -> Result<Principal, AuthError> {
        let token = resolve_token(header)?;
        let claims = self.codec.decode_raw_at(token, now)?;
        let user = self.lookup(&claims.sub).await?;

        debug!(subject = %claims.sub, role = %claims.role, "Bearer token accepted");
        Ok(Principal::new(&user, claims.role))
    }

    /// 폼 자격 증명 프로토콜.
    pub async fn authenticate_form(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Principal, AuthError> {
        let user = self.lookup(username).await?;

        let matches = verify_password(password, &user.password_digest)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !matches {
            return Err(AuthError::BadCredentials);
        }

        debug!(subject = %user.username, "Form credentials accepted");
        Ok(Principal::new(&user, user.role))
    }

    async fn lookup(&self, username: &str) -> Result<User, AuthError> {
        self.users
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UnknownPrincipal)
    }
}
