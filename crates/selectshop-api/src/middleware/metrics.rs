//! HTTP 요청 metrics middleware.
//!
//! 경로 라벨은 실제 URI가 아니라 라우터가 매칭한 템플릿(`/api/products/{id}`)을 씁니다.
//! 어느 라우트에도 맞지 않은 요청은 하나의 라벨로 묶어 라벨 수가 늘어나지 않게 합니다.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::metrics::{record_http_duration, record_http_request, record_http_response};

/// 라우트에 매칭되지 않은 요청의 경로 라벨.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// 요청의 경로 라벨.
pub fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// 요청 수, 상태 코드별 응답 수, 처리 시간을 기록합니다.
///
/// 보안 파이프라인보다 바깥에 두므로 401/403으로 끝난 요청도 집계됩니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().as_str().to_owned();
    let route = route_label(&request);

    record_http_request(&method, &route);
    let response = next.run(request).await;

    let elapsed = started.elapsed().as_secs_f64();
    record_http_response(&method, &route, response.status().as_u16());
    record_http_duration(&method, &route, elapsed);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{HeaderValue, StatusCode},
        middleware,
        routing::{get, put},
        Router,
    };
    use tower::ServiceExt;

    /// 계산된 라벨을 응답 헤더로 돌려주는 레이어.
    async fn expose_label(request: Request, next: Next) -> Response {
        let label = route_label(&request);
        let mut response = next.run(request).await;
        if let Ok(value) = HeaderValue::from_str(&label) {
            response.headers_mut().insert("x-route", value);
        }
        response
    }

    fn app() -> Router {
        let products = Router::new().route("/{id}", put(|| async { StatusCode::FORBIDDEN }));
        Router::new()
            .route("/health", get(|| async { "ok" }))
            .nest("/api/products", products)
            .layer(middleware::from_fn(expose_label))
            .layer(middleware::from_fn(metrics_layer))
    }

    async fn label_of(method: &str, uri: &str) -> (StatusCode, Option<String>) {
        let response = app()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let label = response
            .headers()
            .get("x-route")
            .map(|v| v.to_str().unwrap().to_string());
        (response.status(), label)
    }

    #[tokio::test]
    async fn test_label_uses_route_template() {
        let (status, label) = label_of("PUT", "/api/products/42").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(label.as_deref(), Some("/api/products/{id}"));
    }

    #[tokio::test]
    async fn test_static_route_label() {
        let (status, label) = label_of("GET", "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(label.as_deref(), Some("/health"));
    }

    #[test]
    fn test_unrouted_request_label() {
        let request = Request::builder().uri("/nope/123").body(Body::empty()).unwrap();
        assert_eq!(route_label(&request), UNMATCHED_ROUTE);
    }
}
