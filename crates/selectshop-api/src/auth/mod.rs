//! 인증 및 권한 부여.
//!
//! 상태 없는 Bearer 토큰 인증과 경로 규칙 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenCodec`]: 서명 토큰 발급/검증
//! - [`Authenticator`]: Bearer/폼 자격 증명으로 주체 확인
//! - [`AccessRules`]: 선언적 경로 규칙 테이블
//! - [`SecurityPipeline`]: 인증 → 접근 결정 → 주체 설치 미들웨어
//! - [`CurrentPrincipal`]: 핸들러용 주체 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     CurrentPrincipal(principal): CurrentPrincipal,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", principal.subject)
//! }
//! ```

mod access;
mod authenticator;
mod error;
mod jwt;
mod middleware;
mod password;
mod principal;

pub use access::{AccessPolicy, AccessRules, PathPattern, ProductScope};
pub use authenticator::{resolve_token, Authenticator, FormCredentials};
pub use error::{AuthError, AuthErrorBody, UnauthenticatedReason};
pub use jwt::{
    Claims, EncodeError, KeyError, TokenCodec, TokenError, AUTHORIZATION_HEADER,
    AUTHORIZATION_KEY, BEARER_PREFIX, DEFAULT_TOKEN_TTL_SECS,
};
pub use middleware::{security_layer, SecurityPipeline, FORM_LOGIN_ROUTES};
pub use password::{
    hash_password, secrets_match, validate_password_strength, verify_password, PasswordError,
};
pub use principal::{require_role, CurrentPrincipal, OptionalPrincipal, Principal};
