//! 관심상품 API 서버.
//!
//! 설정을 로드하고 저장소/토큰 코덱/검색 클라이언트를 구성한 뒤 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use selectshop_api::metrics::setup_metrics_recorder;
use selectshop_api::repository::{
    MemoryProductStore, MemoryUserStore, PgProductStore, PgUserStore, ProductStore, UserStore,
};
use selectshop_api::routes::create_app;
use selectshop_api::state::AppState;
use selectshop_api::tasks::start_price_refresh_task;
use selectshop_api::TokenCodec;
use selectshop_core::{init_logging, AppConfig, DatabaseConfig, LogConfig};
use selectshop_search::{NaverShoppingClient, ShoppingSearch};

/// CORS 레이어 생성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        // 로그인 응답의 토큰 헤더를 브라우저에서 읽을 수 있어야 함
        .expose_headers([header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

/// 저장소 구성.
///
/// DB URL이 있으면 PostgreSQL에 연결하고 마이그레이션을 실행합니다.
async fn create_stores(
    config: &DatabaseConfig,
) -> anyhow::Result<(Arc<dyn UserStore>, Arc<dyn ProductStore>, Option<sqlx::PgPool>)> {
    let Some(url) = &config.url else {
        warn!("database.url not set, using in-memory stores (data is lost on restart)");
        return Ok((
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryProductStore::new()),
            None,
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(url.expose_secret())
        .await
        .context("데이터베이스 연결 실패")?;

    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .context("데이터베이스 연결 확인 실패")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("마이그레이션 실패")?;
    info!(max_connections = config.max_connections, "Database connected");

    Ok((
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgProductStore::new(pool.clone())),
        Some(pool),
    ))
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 `true`를 돌려줍니다.
fn handle_export_openapi() -> anyhow::Result<bool> {
    use selectshop_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        println!("{}", serde_json::to_string_pretty(&ApiDoc::openapi())?);
        return Ok(true);
    }

    Ok(false)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_export_openapi()? {
        return Ok(());
    }

    let config = AppConfig::load_default().context("설정 로드 실패")?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    info!("Starting Selectshop API server...");

    let metrics_handle = setup_metrics_recorder().context("Prometheus 레코더 설치 실패")?;
    info!("Prometheus metrics recorder initialized");

    let codec = TokenCodec::new(config.auth.jwt_secret.expose_secret(), config.auth.token_ttl_secs)
        .context("auth.jwt_secret이 유효하지 않습니다")?;

    let search = NaverShoppingClient::from_config(&config.naver).context("검색 클라이언트 생성 실패")?;
    if !search.is_configured() {
        warn!("naver.client_id not set, /api/search will fail upstream");
    }

    let (users, products, db_pool) = create_stores(&config.database).await?;

    let mut state = AppState::new(
        Arc::new(codec),
        SecretString::new(config.auth.admin_token.expose_secret().into()),
        users,
        products,
        Arc::new(search),
    );
    if let Some(pool) = db_pool {
        state = state.with_db_pool(pool);
    }
    let state = Arc::new(state);

    info!(
        version = %state.version,
        has_db = state.db_pool.is_some(),
        token_ttl_secs = config.auth.token_ttl_secs,
        "Application state initialized"
    );

    let shutdown_token = CancellationToken::new();

    let refresh_handle = start_price_refresh_task(
        &config.price_refresh,
        state.product_service.clone(),
        state.search.clone(),
        shutdown_token.clone(),
    );

    let app = create_app(state, Some(metrics_handle))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_secs),
        ))
        .layer(cors_layer());

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("{addr} 바인딩 실패"))?;

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown initiated, cleaning up...");
    shutdown_token.cancel();

    if let Some(handle) = refresh_handle {
        if tokio::time::timeout(Duration::from_secs(10), handle).await.is_err() {
            warn!("PriceRefreshTask did not stop in time");
        }
    }

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기 (Ctrl+C 또는 SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
