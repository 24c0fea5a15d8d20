//! 관심상품 API의 소유권/역할 기반 접근 통합 테스트.

mod common;

use axum::http::StatusCode;

use selectshop_api::repository::UserStore;

use common::{get_request, json_request, new_product, TestApp};

#[tokio::test]
async fn test_product_routes_return_null_without_token() {
    let app = TestApp::new();

    let list = app.send(get_request("/api/products", None)).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body, "null");

    let create = app
        .send(json_request("POST", "/api/products", None, new_product("맥북")))
        .await;
    assert_eq!(create.status, StatusCode::OK);
    assert_eq!(create.body, "null");

    let update = app
        .send(json_request(
            "PUT",
            "/api/products/1",
            None,
            serde_json::json!({ "myprice": 1000 }),
        ))
        .await;
    assert_eq!(update.status, StatusCode::OK);
    assert_eq!(update.body, "null");
}

#[tokio::test]
async fn test_create_product_owned_by_caller() {
    let app = TestApp::new();
    let token = app.login_as("alice", false).await;

    let response = app
        .send(json_request("POST", "/api/products", Some(&token), new_product("맥북")))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let product = response.json();
    assert_eq!(product["title"], "맥북");
    assert_eq!(product["myprice"], 0);
    assert_eq!(product["lprice"], 15000);

    let alice = app.users.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(product["user_id"], alice.id);
}

#[tokio::test]
async fn test_update_isolated_by_owner() {
    let app = TestApp::new();
    let alice = app.login_as("alice", false).await;
    let bob = app.login_as("bob01", false).await;

    let created = app
        .send(json_request("POST", "/api/products", Some(&alice), new_product("맥북")))
        .await
        .json();
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/products/{id}");
    let body = serde_json::json!({ "myprice": 9000 });

    // 남의 상품과 없는 상품은 같은 404
    let foreign = app
        .send(json_request("PUT", &uri, Some(&bob), body.clone()))
        .await;
    let missing = app
        .send(json_request("PUT", "/api/products/9999", Some(&bob), body.clone()))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(foreign.json()["code"], missing.json()["code"]);

    let own = app.send(json_request("PUT", &uri, Some(&alice), body)).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.json(), serde_json::json!(id));

    let listed = app.send(get_request("/api/products", Some(&alice))).await.json();
    assert_eq!(listed[0]["myprice"], 9000);
}

#[tokio::test]
async fn test_listing_scoped_by_role() {
    let app = TestApp::new();
    let alice = app.login_as("alice", false).await;
    let bob = app.login_as("bob01", false).await;
    let admin = app.login_as("boss1", true).await;

    for (token, title) in [(&alice, "a-1"), (&alice, "a-2"), (&bob, "b-1")] {
        let response = app
            .send(json_request("POST", "/api/products", Some(token), new_product(title)))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let titles = |value: serde_json::Value| -> Vec<String> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect()
    };

    let alice_list = app.send(get_request("/api/products", Some(&alice))).await;
    assert_eq!(titles(alice_list.json()), vec!["a-1", "a-2"]);

    let bob_list = app.send(get_request("/api/products", Some(&bob))).await;
    assert_eq!(titles(bob_list.json()), vec!["b-1"]);

    let admin_list = app.send(get_request("/api/products", Some(&admin))).await;
    assert_eq!(titles(admin_list.json()), vec!["a-1", "a-2", "b-1"]);
}

#[tokio::test]
async fn test_refresh_prices_uses_search_results() {
    let app = TestApp::new();
    let alice = app.login_as("alice", false).await;
    app.send(json_request("POST", "/api/products", Some(&alice), new_product("맥북")))
        .await;

    let report = app
        .state
        .product_service
        .refresh_prices(app.state.search.as_ref())
        .await
        .unwrap();
    assert_eq!(report.updated, 1);

    let listed = app.send(get_request("/api/products", Some(&alice))).await.json();
    assert_eq!(listed[0]["lprice"], 12000);
}
