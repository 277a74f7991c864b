//! Shared harness: a router over a fresh database (in-memory, or a temporary
//! file when connection concurrency matters), driven with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use polyglot_api::{build_router, AppState};
use polyglot_common::config::{AppConfig, DatabaseConfig};
use polyglot_db::Database;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret123";

pub struct TestApp {
    pub router: Router,
    pub db: Database,
    /// Keeps a file-backed database alive for the test's duration.
    _dir: Option<TempDir>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(AppConfig::default()).await
}

pub async fn spawn_app_with(config: AppConfig) -> TestApp {
    let db = Database::in_memory().await.expect("in-memory database");
    let router = build_router(AppState::new(db.clone(), config));
    TestApp {
        router,
        db,
        _dir: None,
    }
}

/// An app over a pooled SQLite file, so requests run on separate connections
/// the way they do in production.
pub async fn spawn_file_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = AppConfig::default();
    config.database = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("polyglot.db").display()),
        max_connections: 4,
        min_connections: 1,
    };

    let db = Database::connect(&config.database).await.expect("file database");
    db.migrate().await.expect("migrations");
    let router = build_router(AppState::new(db.clone(), config));
    TestApp {
        router,
        db,
        _dir: Some(dir),
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Send a JSON request and decode the JSON response (`Null` for an empty body).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self.send(request).await;
        let status = response.status();
        let bytes = body_bytes(response).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, name: &str, email: &str) -> (StatusCode, Value) {
        self.post(
            "/api/register",
            None,
            json!({
                "name": name,
                "email": email,
                "password": PASSWORD,
                "password_confirmation": PASSWORD,
            }),
        )
        .await
    }

    /// Register a fresh user and return its bearer token.
    pub async fn token(&self) -> String {
        let (status, body) = self.register("Test User", "test@example.com").await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn create_locale(&self, token: &str, name: &str, short_code: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/locales",
                Some(token),
                json!({ "name": name, "short_code": short_code }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().expect("locale id")
    }

    pub async fn create_translation(
        &self,
        token: &str,
        key: &str,
        locale_id: i64,
        content: &str,
        tags: &[&str],
    ) -> Value {
        let (status, body) = self
            .post(
                "/api/translations",
                Some(token),
                json!({
                    "key": key,
                    "locale_id": locale_id,
                    "content": content,
                    "tags": tags,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

pub async fn body_bytes(response: Response) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
}

/// Percent-encode every byte, for non-ASCII query values.
pub fn encode_query_value(value: &str) -> String {
    value.bytes().map(|b| format!("%{b:02X}")).collect()
}

/// Field codes of a validation envelope, in response order.
pub fn error_codes(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["code"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
