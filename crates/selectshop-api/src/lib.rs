//! 관심상품 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - 상태 없는 Bearer 토큰 인증과 경로 규칙 기반 접근 제어
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 토큰 코덱, 요청 인증기, 접근 결정, 보안 파이프라인
//! - [`services`]: 회원가입/로그인, 관심상품 서비스
//! - [`repository`]: 자격증명/상품 저장소 (PostgreSQL, 인메모리)
//! - [`tasks`]: 최저가 주기 갱신
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod tasks;

pub use auth::{
    AccessPolicy, AccessRules, AuthError, Authenticator, Claims, CurrentPrincipal,
    OptionalPrincipal, Principal, SecurityPipeline, TokenCodec, TokenError,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::{create_api_router, create_app};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
