//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 여러 요청 간에 공유됩니다.
//! 요청별 인증 주체는 여기가 아니라 요청 extensions에만 존재합니다.

use std::sync::Arc;

use secrecy::SecretString;
use sqlx::PgPool;

use selectshop_search::ShoppingSearch;

use crate::auth::{AccessRules, Authenticator, SecurityPipeline, TokenCodec};
use crate::repository::{ProductStore, UserStore};
use crate::services::{ProductService, UserService};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 쇼핑 검색 클라이언트
    pub search: Arc<dyn ShoppingSearch>,

    /// 회원가입/로그인 서비스
    pub user_service: UserService,

    /// 관심상품 서비스
    pub product_service: ProductService,

    /// 보안 파이프라인 (인증 → 접근 결정)
    pub security: SecurityPipeline,

    /// 데이터베이스 연결 풀 (미설정 시 인메모리 저장소)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// 코덱과 저장소는 인증기, 서비스, 보안 파이프라인이 나눠 가집니다.
    pub fn new(
        codec: Arc<TokenCodec>,
        admin_token: SecretString,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        search: Arc<dyn ShoppingSearch>,
    ) -> Self {
        let authenticator = Authenticator::new(codec.clone(), users.clone());

        Self {
            user_service: UserService::new(users, authenticator.clone(), codec, admin_token),
            product_service: ProductService::new(products),
            security: SecurityPipeline::new(authenticator, AccessRules::service_defaults()),
            search,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 설정 (헬스 체크용).
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 JWT 비밀 키 (base64, 32바이트 이상).
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "c2VjcmV0LWtleS1mb3ItdGVzdGluZy1vbmx5LTMyYnl0ZXMh";

/// 테스트용 관리자 가입 암호.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_ADMIN_TOKEN: &str = "admin-secret";

/// 테스트용 AppState 생성 헬퍼.
///
/// DB와 외부 검색 API 없이 인메모리 저장소로 동작합니다.
/// 검색 클라이언트는 자격 증명이 비어 있어 실제 호출하면 실패합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::repository::{MemoryProductStore, MemoryUserStore};
    use selectshop_core::NaverConfig;
    use selectshop_search::NaverShoppingClient;

    let codec = TokenCodec::new(TEST_JWT_SECRET, 3600).expect("test secret is valid");
    let search = NaverShoppingClient::from_config(&NaverConfig::default())
        .expect("Failed to create search client for test");

    AppState::new(
        Arc::new(codec),
        SecretString::new(TEST_ADMIN_TOKEN.into()),
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryProductStore::new()),
        Arc::new(search),
    )
}
