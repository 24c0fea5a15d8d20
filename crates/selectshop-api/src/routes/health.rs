//! 헬스 체크 endpoint.
//!
//! - `GET /health`: 프로세스가 응답하는지만 확인 (liveness)
//! - `GET /health/ready`: 저장소와 검색 API 준비 상태 (readiness)
//!
//! 저장소가 응답하지 않으면 503, 검색 API 자격 증명만 빠져 있으면 200과 `degraded`.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 서비스 전체 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Healthy,
    /// 검색 등 선택 기능 일부 사용 불가
    Degraded,
    /// 저장소 장애
    Unavailable,
}

/// 개별 의존성 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentState {
    Up,
    Down,
    NotConfigured,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    pub state: ComponentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ComponentStatus {
    fn new(state: ComponentState, detail: Option<&str>) -> Self {
        Self {
            state,
            detail: detail.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// 사용자/관심상품 저장소
    pub store: ComponentStatus,
    /// 쇼핑 검색 API
    pub search: ComponentStatus,
}

impl ComponentHealth {
    /// 컴포넌트 상태로 전체 상태와 HTTP 상태 코드 결정.
    pub fn overall(&self) -> (ServiceStatus, StatusCode) {
        if self.store.state != ComponentState::Up {
            (ServiceStatus::Unavailable, StatusCode::SERVICE_UNAVAILABLE)
        } else if self.search.state != ComponentState::Up {
            (ServiceStatus::Degraded, StatusCode::OK)
        } else {
            (ServiceStatus::Healthy, StatusCode::OK)
        }
    }
}

/// readiness 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub uptime_secs: i64,
    pub checked_at: DateTime<Utc>,
    pub components: ComponentHealth,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "서버 동작 중", body = String)),
    tag = "health"
)]
pub async fn health_check() -> &'static str {
    "OK"
}

#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "요청 처리 가능 (검색 미설정 시 degraded)", body = HealthResponse),
        (status = 503, description = "저장소 응답 없음", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_ready(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = match &state.db_pool {
        None => ComponentStatus::new(ComponentState::Up, Some("in-memory")),
        Some(_) if state.is_db_healthy().await => {
            ComponentStatus::new(ComponentState::Up, Some("postgres"))
        }
        Some(_) => ComponentStatus::new(ComponentState::Down, Some("postgres ping failed")),
    };

    let search = if state.search.is_configured() {
        ComponentStatus::new(ComponentState::Up, None)
    } else {
        ComponentStatus::new(ComponentState::NotConfigured, Some("client credentials missing"))
    };

    let components = ComponentHealth { store, search };
    let (status, code) = components.overall();

    let body = HealthResponse {
        status,
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        checked_at: Utc::now(),
        components,
    };
    (code, Json(body))
}

pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
