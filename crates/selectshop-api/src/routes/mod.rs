//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/user/signup`, `/api/user/login` - 회원가입/로그인
//! - `/api/products` - 관심상품 등록/조회/희망가 수정
//! - `/api/search` - 쇼핑 검색 프록시
//! - `/api/test-secured` - 관리자 확인용
//! - `/metrics` - Prometheus 메트릭
//!
//! 모든 라우트는 [`security_layer`] 뒤에 있으며, 접근 규칙은
//! [`AccessRules::service_defaults`](crate::auth::AccessRules::service_defaults)에 정의됩니다.

pub mod health;
pub mod products;
pub mod search;
pub mod secured;
pub mod users;

pub use health::{
    health_router, ComponentHealth, ComponentState, ComponentStatus, HealthResponse, ServiceStatus,
};
pub use products::products_router;
pub use search::SearchQuery;
pub use users::{users_router, LoginRequest};

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::auth::security_layer;
use crate::middleware::metrics_layer;
use crate::openapi::swagger_ui_router;
use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/user", users_router())
        .nest("/api/products", products_router())
        .route("/api/search", get(search::search_items))
        .route("/api/test-secured", post(secured::test_secured))
}

/// `/metrics` 엔드포인트 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 보안 파이프라인과 메트릭 미들웨어를 적용한 애플리케이션 라우터.
///
/// 메트릭 핸들이 없으면 `/metrics`를 마운트하지 않습니다.
/// CORS, 타임아웃, 트레이스 레이어는 바이너리에서 바깥에 추가합니다.
pub fn create_app(state: Arc<AppState>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let security = state.security.clone();

    let mut router = Router::new()
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router());

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state(handle),
        );
    }

    router
        .layer(middleware::from_fn_with_state(security, security_layer))
        .layer(middleware::from_fn(metrics_layer))
}
