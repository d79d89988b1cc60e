//! Test helpers: an in-memory application and request shortcuts.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use tokengate_api::{AppState, build_router};
use tokengate_auth::{
    CredentialVerifier, MemoryAuditLog, MemoryTokenStore, MemoryUserDirectory, PasswordHasher,
    TokenIssuer,
};
use tokengate_core::config::AppConfig;
use tokengate_core::models::Identity;
use tokengate_core::traits::ManualClock;

/// An application wired to in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryTokenStore>,
    pub audit: MemoryAuditLog,
}

/// A parsed response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl TestResponse {
    /// The `Set-Cookie` header, if any.
    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get("set-cookie")
            .map(|v| v.to_str().unwrap().to_string())
    }

    /// The token carried by the `access_token` cookie, if any.
    pub fn cookie_token(&self) -> Option<String> {
        let cookie = self.set_cookie()?;
        let pair = cookie.split(';').next()?;
        pair.strip_prefix("access_token=").map(str::to_string)
    }

    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::from_toml(
        r#"
        [auth]
        jwt_secret = "integration-test-secret"
        access_token_ttl = "15m"
        refresh_token_ttl = "24h"
        cookie_path = "/api"
        "#,
    )
    .unwrap()
}

pub fn test_state() -> (AppState, Arc<ManualClock>, Arc<MemoryTokenStore>, MemoryAuditLog) {
    test_state_with(test_config())
}

/// Builds the state with users `alice/secret` and `bob/hunter2`.
pub fn test_state_with(
    config: AppConfig,
) -> (AppState, Arc<ManualClock>, Arc<MemoryTokenStore>, MemoryAuditLog) {
    let config = Arc::new(config);
    let clock = Arc::new(ManualClock::default());
    let hasher = Arc::new(PasswordHasher::insecure_fast());

    let directory = MemoryUserDirectory::new();
    for (username, password, group) in [("alice", "secret", "staff"), ("bob", "hunter2", "admin")] {
        directory.insert(Identity {
            subject_id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hasher.hash_password(password).unwrap(),
            group_id: group.to_string(),
        });
    }

    let store = Arc::new(MemoryTokenStore::new(clock.clone()));
    let audit = MemoryAuditLog::new();
    let verifier = CredentialVerifier::new(Arc::new(directory), hasher).unwrap();
    let issuer = TokenIssuer::new(
        &config.auth,
        verifier,
        store.clone(),
        Arc::new(audit.clone()),
        clock.clone(),
    );

    let state = AppState::new(config, Arc::new(issuer), None);
    (state, clock, store, audit)
}

pub fn test_app() -> TestApp {
    test_app_with(test_config())
}

pub fn test_app_with(config: AppConfig) -> TestApp {
    let (state, clock, store, audit) = test_state_with(config);
    TestApp {
        router: build_router(state.clone()),
        state,
        clock,
        store,
        audit,
    }
}

/// Sends one request through `router`.
pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", authorization)
        .body(Body::empty())
        .unwrap()
}

/// Logs in and returns the `data` object of the response.
pub async fn login(router: &Router, username: &str, password: &str) -> serde_json::Value {
    let response = send(
        router,
        post_json(
            "/api/auth/login",
            serde_json::json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["data"].clone()
}

pub fn bearer(token: &serde_json::Value) -> String {
    format!("Bearer {}", token.as_str().unwrap())
}
