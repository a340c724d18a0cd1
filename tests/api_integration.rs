//! End-to-end API tests: the full router against a temp database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use helpdesk_backend::api::{create_router, AppState};
use helpdesk_backend::auth::JwtHandler;
use helpdesk_backend::store::{schema, Database};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret-key-12345";

/// sha256("legacy123") — a legacy-format stored hash.
const LEGACY_SHA256: &str = "5880a09861771069857bb7b8c659dfe59e8f579bedd29deb98599b996e8463f3";

fn test_app() -> (Router, NamedTempFile) {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_str().unwrap();

    {
        let conn = Connection::open(path).unwrap();
        schema::init_schema(&conn).unwrap();
        schema::ensure_admin(&conn).unwrap();

        // Users covering the two non-bcrypt hash formats.
        conn.execute(
            "INSERT INTO users (username, full_name, password_hash, role)
             VALUES ('legacy', 'Legacy Agent', ?1, 'agent')",
            [LEGACY_SHA256],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO users (username, full_name, password_hash, role)
             VALUES ('devuser', 'Dev User', 'changeme', 'agent')",
            [],
        )
        .unwrap();
    }

    let state = AppState {
        db: Arc::new(Database::new(path).unwrap()),
        jwt: Arc::new(JwtHandler::new(TEST_SECRET.to_string())),
    };

    (create_router(state), temp)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_admin() {
    let (app, _db) = test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "admin123" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"]["name"].is_string());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (app, _db) = test_app();

    let (wrong_pw_status, wrong_pw_body) = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "nope" })),
        ),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        json_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "ghost", "password": "nope" })),
        ),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, unknown_body);
}

#[tokio::test]
async fn test_legacy_hash_formats_can_log_in() {
    let (app, _db) = test_app();

    // sha256-hex stored hash
    login(&app, "legacy", "legacy123").await;
    // plaintext development fallback
    login(&app, "devuser", "changeme").await;
}

#[tokio::test]
async fn test_tickets_require_auth() {
    let (app, _db) = test_app();

    let (status, _) = send(&app, json_request("GET", "/tickets", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("GET", "/tickets", Some("not-a-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_raw_token_without_bearer_prefix_accepted() {
    let (app, _db) = test_app();
    let token = login(&app, "admin", "admin123").await;

    let request = Request::builder()
        .method("GET")
        .uri("/tickets")
        .header("Authorization", token.as_str())
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
}

#[tokio::test]
async fn test_token_from_rotated_secret_rejected() {
    let (app, _db) = test_app();

    let other = JwtHandler::new("a-different-secret".to_string());
    let stale = other.issue("admin").unwrap();

    let (status, _) = send(&app, json_request("GET", "/tickets", Some(&stale), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_rejected() {
    let (app, db) = test_app();
    let token = login(&app, "devuser", "changeme").await;

    {
        let conn = Connection::open(db.path()).unwrap();
        conn.execute("DELETE FROM users WHERE username = 'devuser'", [])
            .unwrap();
    }

    let (status, _) = send(&app, json_request("GET", "/tickets", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_full_ticket_lifecycle() {
    let (app, _db) = test_app();
    let token = login(&app, "admin", "admin123").await;

    // Create
    let (status, ticket) = send(
        &app,
        json_request("POST", "/tickets", Some(&token), Some(json!({ "title": "T1" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["title"], "T1");
    assert_eq!(ticket["status"], "open");
    assert_eq!(ticket["description"], "");
    assert_eq!(ticket["priority"], "medium");
    assert!(ticket["assignee_id"].is_null());
    assert_eq!(ticket["comments"], json!([]));
    let id = ticket["id"].as_str().unwrap().to_string();

    // Comment
    let (status, comment) = send(
        &app,
        json_request(
            "POST",
            &format!("/tickets/{id}/comments"),
            Some(&token),
            Some(json!({ "text": "hi" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comment["text"], "hi");
    assert!(comment["id"].is_string());

    // Close
    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/tickets/{id}"),
            Some(&token),
            Some(json!({ "status": "closed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "closed");
    assert_eq!(updated["title"], "T1");
    assert_eq!(updated["comments"].as_array().unwrap().len(), 1);
    assert_eq!(updated["comments"][0]["text"], "hi");

    // Delete
    let (status, body) = send(
        &app,
        json_request("DELETE", &format!("/tickets/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    // Gone from the listing
    let (status, listing) = send(&app, json_request("GET", "/tickets", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&id.as_str()));
}

#[tokio::test]
async fn test_listing_orders_newest_first() {
    let (app, _db) = test_app();
    let token = login(&app, "admin", "admin123").await;

    for title in ["A", "B"] {
        let (status, _) = send(
            &app,
            json_request("POST", "/tickets", Some(&token), Some(json!({ "title": title }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, listing) = send(&app, json_request("GET", "/tickets", Some(&token), None)).await;
    let titles: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B", "A"]);
}

#[tokio::test]
async fn test_missing_ticket_returns_not_found() {
    let (app, _db) = test_app();
    let token = login(&app, "admin", "admin123").await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/tickets/999",
            Some(&token),
            Some(json!({ "status": "closed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request("DELETE", "/tickets/999", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/tickets/999/comments",
            Some(&token),
            Some(json!({ "text": "hello" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_requires_text() {
    let (app, _db) = test_app();
    let token = login(&app, "admin", "admin123").await;

    let (_, ticket) = send(
        &app,
        json_request("POST", "/tickets", Some(&token), Some(json!({ "title": "T1" }))),
    )
    .await;
    let id = ticket["id"].as_str().unwrap();

    for payload in [json!({}), json!({ "text": "" })] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                &format!("/tickets/{id}/comments"),
                Some(&token),
                Some(payload),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_users_listing_is_admin_only() {
    let (app, _db) = test_app();

    let admin_token = login(&app, "admin", "admin123").await;
    let (status, body) = send(&app, json_request("GET", "/users", Some(&admin_token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let usernames: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert!(usernames.contains(&"admin"));
    assert!(usernames.contains(&"legacy"));
    assert!(body[0]["full_name"].is_string());
    assert!(body[0]["id"].is_i64());

    let agent_token = login(&app, "legacy", "legacy123").await;
    let (status, _) = send(&app, json_request("GET", "/users", Some(&agent_token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_any_authenticated_user_may_update_and_delete() {
    let (app, _db) = test_app();

    let admin_token = login(&app, "admin", "admin123").await;
    let agent_token = login(&app, "legacy", "legacy123").await;

    let (_, ticket) = send(
        &app,
        json_request(
            "POST",
            "/tickets",
            Some(&admin_token),
            Some(json!({ "title": "admin's ticket" })),
        ),
    )
    .await;
    let id = ticket["id"].as_str().unwrap().to_string();

    // No ownership restriction: a different user can mutate and delete.
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/tickets/{id}"),
            Some(&agent_token),
            Some(json!({ "priority": "high" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request("DELETE", &format!("/tickets/{id}"), Some(&agent_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _db) = test_app();

    let (status, body) = send(&app, json_request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
