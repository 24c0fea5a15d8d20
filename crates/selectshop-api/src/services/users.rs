//! 회원가입 및 로그인 서비스.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use selectshop_core::{NewUser, ShopError, UserRole};

use crate::auth::{
    hash_password, secrets_match, validate_password_strength, Authenticator, Principal, TokenCodec,
};
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_login, record_signup};
use crate::repository::UserStore;

/// 회원가입 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// 사용자 이름 (4~10자)
    #[validate(length(min = 4, max = 10, message = "사용자 이름은 4~10자여야 합니다"))]
    pub username: String,
    /// 비밀번호 (8자 이상, 영문자와 숫자 포함)
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    /// 이메일
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,
    /// 관리자 가입 여부
    #[serde(default)]
    pub admin: bool,
    /// 관리자 가입용 공유 암호
    #[serde(default)]
    pub admin_token: String,
}

/// 회원가입 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

/// 회원가입/로그인 서비스.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    authenticator: Authenticator,
    codec: Arc<TokenCodec>,
    admin_token: Arc<SecretString>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        authenticator: Authenticator,
        codec: Arc<TokenCodec>,
        admin_token: SecretString,
    ) -> Self {
        Self {
            users,
            authenticator,
            codec,
            admin_token: Arc::new(admin_token),
        }
    }

    /// 회원가입.
    ///
    /// 사용자 이름 사전 검사는 빠른 거절용이며, 동시 가입 경쟁은 저장소의
    /// 유일성 제약이 최종 판정합니다.
    pub async fn signup(&self, request: SignupRequest) -> ApiResult<SignupResponse> {
        request.validate()?;

        if self.users.exists_by_username(&request.username).await? {
            return Err(ShopError::DuplicateUsername(request.username).into());
        }

        let role = if request.admin {
            if !secrets_match(&request.admin_token, self.admin_token.expose_secret()) {
                warn!(username = %request.username, "Admin signup rejected: token mismatch");
                return Err(ShopError::AdminTokenMismatch.into());
            }
            UserRole::Admin
        } else {
            UserRole::User
        };

        let password_digest =
            hash_password(&request.password).map_err(|e| ShopError::Internal(e.to_string()))?;

        let user = self
            .users
            .insert(NewUser {
                username: request.username,
                password_digest,
                email: request.email,
                role,
            })
            .await?;

        record_signup(role.authority());
        info!(user_id = user.id, username = %user.username, role = %role, "User signed up");

        Ok(SignupResponse {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }

    /// 사용자 이름/비밀번호로 로그인하고 `Bearer ` 접두사가 붙은 토큰을 돌려줍니다.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        match self.authenticator.authenticate_form(username, password).await {
            Ok(principal) => self.issue_token(&principal),
            Err(err) => {
                record_login("failure");
                Err(err.into())
            }
        }
    }

    /// 이미 인증된 주체에게 토큰 발급.
    pub fn issue_token(&self, principal: &Principal) -> ApiResult<String> {
        let token = self
            .codec
            .encode(&principal.subject, principal.role, chrono::Utc::now().timestamp())
            .map_err(|e| ApiError::from(ShopError::Internal(e.to_string())))?;

        record_login("success");
        info!(subject = %principal.subject, role = %principal.role, "Token issued");
        Ok(token)
    }
}
