use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::json;

use userbase_api::app::{build_app, AppServices};
use userbase_core::{User, UserId, UserProfile};
use userbase_infra::{StoreError, UserGateway};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn in_memory() -> Self {
        Self::spawn(AppServices::in_memory()).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Gateway whose every call fails, counting how often it was reached.
#[derive(Default)]
struct FailingGateway {
    calls: AtomicUsize,
}

impl FailingGateway {
    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UserGateway for FailingGateway {
    async fn insert(&self, _profile: &UserProfile) -> Result<UserId, StoreError> {
        self.fail()
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, StoreError> {
        self.fail()
    }

    async fn replace_by_id(&self, _id: UserId, _profile: &UserProfile) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn delete_by_id(&self, _id: UserId) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        self.fail()
    }
}

fn ann() -> serde_json::Value {
    json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "a@x.com",
        "password": "p",
        "age": 30,
    })
}

async fn list_users(client: &reqwest::Client, srv: &TestServer) -> Vec<serde_json::Value> {
    let res = client.get(srv.url("/get-users")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn user_lifecycle_create_get_update_delete() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(srv.url("/create-user"))
        .json(&ann())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "User created Successfully.");

    // Discover the id through the list
    let users = list_users(&client, &srv).await;
    assert_eq!(users.len(), 1);
    let listed = &users[0];
    let id = listed["id"].as_i64().unwrap();
    assert_eq!(listed["firstName"], "Ann");
    assert_eq!(listed["lastName"], "Lee");
    assert_eq!(listed["email"], "a@x.com");
    assert_eq!(listed["password"], "p");
    assert_eq!(listed["age"], 30);

    // Get returns the identical record
    let res = client
        .get(srv.url(&format!("/get-user/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(&fetched, listed);

    // Update age only; the rest is resent as a full replacement
    let mut updated = ann();
    updated["age"] = json!(31);
    let res = client
        .put(srv.url(&format!("/update-user/{id}")))
        .json(&updated)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "User updated Successfully.");

    let fetched: User = client
        .get(srv.url(&format!("/get-user/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.id, UserId::new(id));
    assert_eq!(fetched.profile.age, 31);
    assert_eq!(fetched.profile.first_name, "Ann");
    assert_eq!(fetched.profile.email, "a@x.com");

    // Delete, then the record is gone
    let res = client
        .delete(srv.url(&format!("/delete-user/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "User deleted Successfully.");

    let res = client
        .get(srv.url(&format!("/get-user/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn list_on_empty_store_is_empty_array() {
    let srv = TestServer::in_memory().await;
    let res = reqwest::get(srv.url("/get-users")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "[]");
}

#[tokio::test]
async fn get_absent_id_is_not_found() {
    let srv = TestServer::in_memory().await;
    let res = reqwest::get(srv.url("/get-user/12345")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_is_rejected_before_the_store() {
    let gateway = Arc::new(FailingGateway::default());
    let srv = TestServer::spawn(AppServices::new(gateway.clone())).await;
    let client = reqwest::Client::new();

    let cases = [
        (Method::GET, "/get-user/abc"),
        (Method::GET, "/get-user/1.5"),
        (Method::PUT, "/update-user/x1"),
        (Method::DELETE, "/delete-user/%20"),
    ];
    for (method, path) in cases {
        let res = client
            .request(method.clone(), srv.url(path))
            .json(&ann())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{method} {path}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Invalid user ID");
    }

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn undecodable_id_segment_gets_json_error_body() {
    let gateway = Arc::new(FailingGateway::default());
    let srv = TestServer::spawn(AppServices::new(gateway.clone())).await;
    let client = reqwest::Client::new();

    let cases = [
        (Method::GET, "/get-user/%FF"),
        (Method::PUT, "/update-user/%FF%FE"),
        (Method::DELETE, "/delete-user/%C3"),
    ];
    for (method, path) in cases {
        let res = client
            .request(method.clone(), srv.url(path))
            .json(&ann())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{method} {path}");
        assert_eq!(
            res.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["message"], "Invalid user ID");
    }

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn create_matches_keys_ignoring_case() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/create-user"))
        .body(r#"{"FirstName":"Ann","AGE":30,"age":31}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let users = list_users(&client, &srv).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["firstName"], "Ann");
    assert_eq!(users[0]["age"], 31);
}

#[tokio::test]
async fn malformed_body_is_rejected_before_the_store() {
    let gateway = Arc::new(FailingGateway::default());
    let srv = TestServer::spawn(AppServices::new(gateway.clone())).await;
    let client = reqwest::Client::new();

    for (method, path) in [(Method::POST, "/create-user"), (Method::PUT, "/update-user/1")] {
        let res = client
            .request(method, srv.url(path))
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Invalid JSON format");
    }

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn update_checks_id_before_body() {
    let srv = TestServer::in_memory().await;
    let res = reqwest::Client::new()
        .put(srv.url("/update-user/nope"))
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid user ID");
}

#[tokio::test]
async fn wrong_method_is_method_not_allowed() {
    let gateway = Arc::new(FailingGateway::default());
    let srv = TestServer::spawn(AppServices::new(gateway.clone())).await;
    let client = reqwest::Client::new();

    let cases = [
        (Method::GET, "/create-user", "Use POST method only"),
        (Method::POST, "/update-user/1", "Use PUT method only"),
        (Method::GET, "/delete-user/1", "Use DELETE method only"),
        (Method::POST, "/get-users", "Use GET method only"),
        (Method::DELETE, "/get-user/1", "Use GET method only"),
    ];
    for (method, path, message) in cases {
        let res = client
            .request(method.clone(), srv.url(path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "method_not_allowed");
        assert_eq!(body["message"], message);
    }

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn method_is_checked_before_the_id() {
    let srv = TestServer::in_memory().await;
    let res = reqwest::Client::new()
        .post(srv.url("/delete-user/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_paths_have_no_route() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    for path in ["/users", "/get-user", "/get-user/1/extra", "/create-user/5"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "no_route");
    }
}

#[tokio::test]
async fn store_failures_are_internal_errors() {
    let gateway = Arc::new(FailingGateway::default());
    let srv = TestServer::spawn(AppServices::new(gateway.clone())).await;
    let client = reqwest::Client::new();

    let cases = [
        (Method::POST, "/create-user", "Database insert failed"),
        (Method::GET, "/get-user/1", "Database error"),
        (Method::PUT, "/update-user/1", "Database update failed"),
        (Method::DELETE, "/delete-user/1", "Database delete failed"),
        (Method::GET, "/get-users", "Database error"),
    ];
    for (method, path, message) in cases {
        let res = client
            .request(method.clone(), srv.url(path))
            .json(&ann())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {path}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "store_error");
        assert_eq!(body["message"], message);
    }

    assert_eq!(gateway.calls(), 5);
}

#[tokio::test]
async fn delete_twice_succeeds_both_times() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    client
        .post(srv.url("/create-user"))
        .json(&ann())
        .send()
        .await
        .unwrap();
    let id = list_users(&client, &srv).await[0]["id"].as_i64().unwrap();

    for _ in 0..2 {
        let res = client
            .delete(srv.url(&format!("/delete-user/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert!(list_users(&client, &srv).await.is_empty());
}

#[tokio::test]
async fn update_of_absent_id_still_succeeds() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = client
        .put(srv.url("/update-user/404"))
        .json(&ann())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(list_users(&client, &srv).await.is_empty());
}

#[tokio::test]
async fn create_accepts_partial_payloads_and_ignores_client_id() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/create-user"))
        .body(r#"{"id": 999, "firstName": "Bo", "extra": true}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let users = list_users(&client, &srv).await;
    assert_eq!(users.len(), 1);
    assert_ne!(users[0]["id"], 999);
    assert_eq!(users[0]["firstName"], "Bo");
    assert_eq!(users[0]["lastName"], "");
    assert_eq!(users[0]["age"], 0);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let url = srv.url("/create-user");
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "firstName": format!("u{i}"), "age": i }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::OK);
    }

    let users = list_users(&client, &srv).await;
    let mut ids: Vec<i64> = users.iter().map(|u| u["id"].as_i64().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}

#[tokio::test]
async fn greetings() {
    let srv = TestServer::in_memory().await;

    let res = reqwest::get(srv.url("/name/Ann")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Hello Ann");

    let res = reqwest::get(srv.url("/name/a/b")).await.unwrap();
    assert_eq!(res.text().await.unwrap(), "Hello a/b");

    let res = reqwest::get(srv.url("/json/Ann")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Hello Ann" }));
}
