//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use selectshop_core::{NewProduct, Product, UserRole};
use selectshop_search::ItemDto;

use crate::auth::{AuthErrorBody, Principal};
use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentState, ComponentStatus, HealthResponse, LoginRequest, ServiceStatus,
};
use crate::services::{SignupRequest, SignupResponse, UpdateMyPriceRequest};

/// Bearer 인증 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Selectshop API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Selectshop API",
        version = "0.1.0",
        description = r#"
# Selectshop 관심상품 REST API

쇼핑 검색 결과를 관심상품으로 저장하고 희망가를 관리합니다.

## 인증

`POST /api/user/login`이 `Authorization` 응답 헤더로 토큰을 발급합니다.
이후 요청에 `Authorization: Bearer <token>` 헤더를 포함하세요.
토큰은 기본 1시간 후 만료됩니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "user", description = "사용자 - 회원가입/로그인"),
        (name = "products", description = "관심상품 - 등록/조회/희망가 수정"),
        (name = "search", description = "검색 - 쇼핑 검색 API 프록시")
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,
            ComponentState,
            ServiceStatus,

            // ===== Common =====
            ApiErrorResponse,
            AuthErrorBody,

            // ===== User =====
            SignupRequest,
            SignupResponse,
            LoginRequest,
            Principal,
            UserRole,

            // ===== Products =====
            Product,
            NewProduct,
            UpdateMyPriceRequest,
            ItemDto,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::users::signup,
        crate::routes::users::login,
        crate::routes::secured::test_secured,
        crate::routes::products::create_product,
        crate::routes::products::list_products,
        crate::routes::products::update_product,
        crate::routes::search::search_items,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("Selectshop API"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/user/signup"));
        assert!(json.contains("/api/user/login"));
        assert!(json.contains("/api/products/{id}"));
        assert!(json.contains("/api/search"));
        assert!(json.contains("/api/test-secured"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("SignupRequest"));
        assert!(json.contains("AuthErrorBody"));
        assert!(json.contains("ItemDto"));
        assert!(json.contains("ROLE_ADMIN"));
        assert!(json.contains("adminToken"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let spec = ApiDoc::openapi();
        let components = spec.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
