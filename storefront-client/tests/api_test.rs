//! Resource wrapper tests: paths, query strings and session upkeep

use serde_json::json;
use std::sync::Arc;
use storefront_client::{
    AuthEvent, Credentials, EventLog, Gateway, GatewayConfig, ListQuery, MemorySession,
    SessionStore, Sort, StorefrontClient,
};
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

fn client(server: &MockServer, session: Arc<MemorySession>) -> StorefrontClient {
    StorefrontClient::connect(GatewayConfig::new(server.uri()), session).unwrap()
}

fn created(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "statusCode": 201,
        "message": "",
        "data": data,
    }))
}

fn page(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "statusCode": 200,
        "data": {
            "meta": {"current": 1, "pageSize": 16, "pages": 1, "total": 1},
            "result": result,
        },
    }))
}

// ==================== Auth ====================

#[tokio::test]
async fn test_login_stores_token_for_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"username": "user@shop.vn", "password": "123456"})))
        .respond_with(created(json!({
            "access_token": "login-token",
            "user": {"_id": "1", "email": "user@shop.vn", "role": "USER"},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/account"))
        .and(header("authorization", "Bearer login-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"user": {"_id": "1", "email": "user@shop.vn", "role": "ADMIN"}},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(MemorySession::new());
    let client = client(&server, session.clone());

    let login = client
        .auth()
        .login(&Credentials::new("user@shop.vn", "123456"))
        .await
        .unwrap();
    assert_eq!(login.data().unwrap().access_token, "login-token");
    assert_eq!(session.access_token().as_deref(), Some("login-token"));

    let account = client.auth().account().await;
    let account = account.data().unwrap();
    assert_eq!(account.email.as_deref(), Some("user@shop.vn"));
    assert!(account.is_admin());
}

#[tokio::test]
async fn test_failed_login_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "error": "Bad Request",
            "message": "Invalid username or password",
        })))
        .mount(&server)
        .await;

    let session = Arc::new(MemorySession::new());
    let client = client(&server, session.clone());

    let login = client
        .auth()
        .login(&Credentials::new("user@shop.vn", "wrong"))
        .await
        .unwrap();

    assert_eq!(login.message(), Some("Invalid username or password"));
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn test_logout_then_expired_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(created(json!("ok")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/account"))
        .and(NoAuthorization)
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "statusCode": 401,
            "message": "Token missing",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(MemorySession::with_token("tok"));
    let events = Arc::new(EventLog::new());
    let gateway = Gateway::builder(GatewayConfig::new(server.uri()))
        .session(session.clone())
        .on_auth_event(events.clone())
        .build()
        .unwrap();
    let client = StorefrontClient::new(Arc::new(gateway));

    assert!(client.auth().logout().await.is_success());
    assert!(session.access_token().is_none());

    let account = client.auth().account().await;
    assert_eq!(account.status(), Some(401));
    assert_eq!(events.count(&AuthEvent::SessionExpired), 1);
}

#[tokio::test]
async fn test_explicit_refresh_replaces_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"access_token": "rotated"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(MemorySession::with_token("old"));
    let client = client(&server, session.clone());

    assert!(client.auth().refresh().await.is_success());
    assert_eq!(session.access_token().as_deref(), Some("rotated"));
}

// ==================== Catalog ====================

#[tokio::test]
async fn test_phone_search_sends_list_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/phones"))
        .and(query_param("current", "1"))
        .and(query_param("pageSize", "16"))
        .and(query_param("sort", "-sold"))
        .and(query_param("price>", "1000"))
        .and(query_param("price<", "2000"))
        .and(query_param("brand", "apple,samsung"))
        .and(query_param("name", "/iphone/i"))
        .respond_with(page(json!([{"_id": "p1", "name": "iPhone 15"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(MemorySession::new()));
    let query = ListQuery::page(1, 16)
        .sort(Sort::desc("sold"))
        .range("price", Some(1000.0), Some(2000.0))
        .equals("brand", ["apple", "samsung"])
        .matching("name", "iphone");

    let envelope = client.phones().list(&query).await;
    let page = envelope.data().unwrap();

    assert_eq!(page.meta.total, 1);
    assert_eq!(page.result[0]["name"], "iPhone 15");
}

#[tokio::test]
async fn test_unexpected_list_shape_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/brands"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "nope"})))
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(MemorySession::new()));
    let envelope = client.brands().list(&ListQuery::default()).await;

    assert_eq!(envelope.failure().unwrap().error, "Invalid Response");
}

#[tokio::test]
async fn test_all_brands_decodes_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/brands/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"name": "Apple"}, {"name": "Samsung"}],
        })))
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(MemorySession::new()));
    let brands = client.brands().all().await;

    assert_eq!(brands.data().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_resource_ids_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/brands/b42"))
        .respond_with(created(json!({"deleted": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/u7"))
        .respond_with(created(json!({"modified": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(MemorySession::with_token("admin")));

    assert!(client.brands().delete("b42").await.is_success());
    assert!(client.users().activate("u7").await.is_success());
}

// ==================== Orders ====================

#[tokio::test]
async fn test_order_history_recovers_from_expired_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/user"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/user"))
        .and(query_param("current", "2"))
        .and(query_param("pageSize", "5"))
        .and(header("authorization", "Bearer renewed"))
        .respond_with(page(json!([{"_id": "o1", "totalPrice": 1200}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .and(NoAuthorization)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"access_token": "renewed"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(MemorySession::with_token("expired"));
    let client = client(&server, session.clone());

    let history = client.orders().history(&ListQuery::page(2, 5)).await;

    assert_eq!(history.data().unwrap().result[0]["_id"], "o1");
    assert_eq!(session.access_token().as_deref(), Some("renewed"));
}

// ==================== Files ====================

#[tokio::test]
async fn test_upload_sends_multipart_with_folder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/files/single"))
        .and(header("folder_type", "product"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(created(json!({"fileName": "iphone-15.png"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(MemorySession::with_token("admin")));
    let envelope = client
        .files()
        .upload_single("iphone-15.png", vec![0x89, 0x50, 0x4e, 0x47], "product")
        .await
        .unwrap();

    assert_eq!(envelope.data().unwrap()["fileName"], "iphone-15.png");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"iphone-15.png\""));
}
