//! 보안 파이프라인 미들웨어.
//!
//! 요청 하나에 대해 아래 단계를 순서대로 실행합니다. 어느 단계든 실패하면
//! 그 자리에서 응답을 돌려주고 핸들러는 실행되지 않습니다.
//!
//! 1. 인증 단계 (경로에 따라 폼 자격 증명 또는 Bearer 토큰 중 하나)
//! 2. 접근 결정 (선언적 규칙 테이블)
//! 3. 주체를 요청 extensions에 설치 → 핸들러
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .merge(routes)
//!     .layer(middleware::from_fn_with_state(pipeline, security_layer));
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequest, Query, Request, State},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
    Form,
};
use tracing::{error, info, warn};

use super::access::{AccessRules, PathPattern};
use super::authenticator::{Authenticator, FormCredentials};
use super::error::{AuthError, UnauthenticatedReason};
use super::jwt::TokenError;
use super::principal::Principal;
use crate::metrics::record_auth_failure;

/// 폼 자격 증명 프로토콜을 쓰는 경로.
pub const FORM_LOGIN_ROUTES: &[&str] = &["/api/user/login", "/api/test-secured"];

/// 폼 본문 최대 크기.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// 요청 보안 파이프라인.
#[derive(Clone)]
pub struct SecurityPipeline {
    authenticator: Authenticator,
    rules: Arc<AccessRules>,
    form_routes: Arc<Vec<PathPattern>>,
}

impl SecurityPipeline {
    pub fn new(authenticator: Authenticator, rules: AccessRules) -> Self {
        Self {
            authenticator,
            rules: Arc::new(rules),
            form_routes: Arc::new(FORM_LOGIN_ROUTES.iter().map(|p| PathPattern::new(p)).collect()),
        }
    }

    pub fn rules(&self) -> &AccessRules {
        &self.rules
    }

    /// 경로가 폼 자격 증명 프로토콜 대상인지 확인.
    pub fn uses_form_protocol(&self, path: &str) -> bool {
        self.form_routes.iter().any(|p| p.matches(path))
    }

    /// 파이프라인 실행.
    ///
    /// 성공 시 (주체가 있으면 설치된) 요청을 돌려줍니다.
    pub async fn run(&self, request: Request) -> Result<Request, AuthError> {
        let path = request.uri().path().to_string();

        let (principal, mut request) = if self.uses_form_protocol(&path) {
            self.form_stage(request).await?
        } else {
            let principal = self.bearer_stage(&request).await?;
            (principal, request)
        };

        self.rules.decide(&path, principal.as_ref())?;

        if let Some(principal) = principal {
            request.extensions_mut().insert(principal);
        }
        Ok(request)
    }

    /// Bearer 단계.
    ///
    /// 헤더가 없으면 미인증으로 계속 진행하고, 헤더가 있는데 잘못되었으면 거절합니다.
    pub fn bearer_stage<'a>(
        &'a self,
        request: &Request,
    ) -> impl Future<Output = Result<Option<Principal>, AuthError>> + Send + 'a {
        // `Request<Body>`는 `Sync`가 아니므로 헤더를 먼저 복사해 미래 값이 `Send`가 되도록 합니다.
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map(str::to_owned));
        async move {
            let header = match header {
                None => return Ok(None),
                Some(value) => value.map_err(|_| {
                    AuthError::Unauthenticated(UnauthenticatedReason::InvalidScheme)
                })?,
            };
            if header.trim().is_empty() {
                return Ok(None);
            }

            self.authenticator
                .authenticate_bearer(Some(&header))
                .await
                .map(Some)
        }
    }

    /// 폼 자격 증명 단계.
    ///
    /// 쿼리 문자열과 `application/x-www-form-urlencoded` 본문에서 `username`/`password`를
    /// 읽습니다. 둘 중 하나라도 없으면 미인증으로 계속 진행합니다.
    /// 본문은 읽은 뒤 그대로 복원하여 핸들러에 넘깁니다.
    pub async fn form_stage(
        &self,
        request: Request,
    ) -> Result<(Option<Principal>, Request), AuthError> {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, MAX_FORM_BYTES)
            .await
            .map_err(|e| AuthError::MalformedRequest(e.to_string()))?;

        let from_query = Query::<FormCredentials>::try_from_uri(&parts.uri)
            .map(|Query(creds)| creds)
            .unwrap_or_default();

        let is_form = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let from_body = if is_form {
            let probe = Request::builder()
                .method(parts.method.clone())
                .uri(parts.uri.clone())
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(bytes.clone()))
                .map_err(|e| AuthError::MalformedRequest(e.to_string()))?;
            Form::<FormCredentials>::from_request(probe, &())
                .await
                .map(|Form(creds)| creds)
                .unwrap_or_default()
        } else {
            FormCredentials::default()
        };

        let credentials = FormCredentials {
            username: from_body.username.or(from_query.username),
            password: from_body.password.or(from_query.password),
        };

        let principal = match credentials.complete() {
            Some((username, password)) => Some(
                self.authenticator
                    .authenticate_form(&username, &password)
                    .await?,
            ),
            None => None,
        };

        Ok((principal, Request::from_parts(parts, Body::from(bytes))))
    }
}

/// 보안 파이프라인 미들웨어.
pub async fn security_layer(
    State(pipeline): State<SecurityPipeline>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match pipeline.run(request).await {
        Ok(request) => next.run(request).await,
        Err(err) => {
            let reason = err.label();
            record_auth_failure(reason);
            match &err {
                AuthError::Unauthenticated(UnauthenticatedReason::Token(
                    TokenError::BadSignature,
                )) => {
                    warn!(%method, %path, reason, "Rejected token with invalid signature");
                }
                AuthError::Internal(detail) => {
                    error!(%method, %path, error = %detail, "Authentication backend failure");
                }
                _ => {
                    info!(%method, %path, reason, "Request rejected by security pipeline");
                }
            }
            err.into_response()
        }
    }
}
