//! 통합 테스트 공통 헬퍼.
//!
//! 인메모리 저장소와 고정 응답 검색 클라이언트로 전체 라우터를 구성합니다.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use selectshop_api::repository::{MemoryProductStore, MemoryUserStore};
use selectshop_api::{create_app, AppState, TokenCodec};
use selectshop_search::{ItemDto, SearchError, ShoppingSearch};

pub const JWT_SECRET: &str = "c2VjcmV0LWtleS1mb3ItdGVzdGluZy1vbmx5LTMyYnl0ZXMh";
pub const ADMIN_TOKEN: &str = "admin-secret";
pub const PASSWORD: &str = "password1";

/// 검색어를 제목으로 하는 항목 하나를 돌려주는 검색 클라이언트.
pub struct EchoSearch;

#[async_trait]
impl ShoppingSearch for EchoSearch {
    async fn search(&self, query: &str) -> Result<Vec<ItemDto>, SearchError> {
        Ok(vec![ItemDto {
            title: query.to_string(),
            link: "https://shop.example/item".to_string(),
            image: "https://shop.example/item.png".to_string(),
            lprice: 12_000,
        }])
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub codec: Arc<TokenCodec>,
    pub users: Arc<MemoryUserStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let codec = Arc::new(TokenCodec::new(JWT_SECRET, 3600).unwrap());
        let users = Arc::new(MemoryUserStore::new());
        let state = Arc::new(AppState::new(
            codec.clone(),
            SecretString::new(ADMIN_TOKEN.into()),
            users.clone(),
            Arc::new(MemoryProductStore::new()),
            Arc::new(EchoSearch),
        ));

        Self {
            router: create_app(state.clone(), None),
            state,
            codec,
            users,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn signup(&self, username: &str, admin: bool) -> TestResponse {
        let body = serde_json::json!({
            "username": username,
            "password": PASSWORD,
            "email": format!("{username}@example.com"),
            "admin": admin,
            "adminToken": if admin { ADMIN_TOKEN } else { "" },
        });
        self.send(json_request("POST", "/api/user/signup", None, body)).await
    }

    /// 가입 후 로그인하여 `Bearer ` 헤더 값을 돌려줍니다.
    pub async fn login_as(&self, username: &str, admin: bool) -> String {
        assert_eq!(self.signup(username, admin).await.status, StatusCode::CREATED);

        let response = self
            .send(form_request(
                "/api/user/login",
                &format!("username={username}&password={PASSWORD}"),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);

        response.headers[header::AUTHORIZATION]
            .to_str()
            .unwrap()
            .to_string()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn new_product(title: &str) -> Value {
    serde_json::json!({
        "title": title,
        "image": "https://shop.example/item.png",
        "link": "https://shop.example/item",
        "lprice": 15000,
    })
}
