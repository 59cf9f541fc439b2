#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use huecos_api::auth::gate::OfflineAdmin;
use huecos_api::auth::jwt::JwtConfig;
use huecos_api::config::ServerConfig;
use huecos_api::router::build_app_router;
use huecos_api::state::AppState;
use huecos_db::{MemoryStore, Store};
use serde_json::Value;
use tower::ServiceExt;

pub const CORS_ORIGIN: &str = "http://localhost:3001";

/// Build a test `ServerConfig` with safe defaults and the `ilde`/`8019`
/// offline admin.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![CORS_ORIGIN.to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_mins: 480,
        },
        storage: Default::default(),
        offline_admin: Some(OfflineAdmin::new("ilde", "8019", "Ilde Núñez").unwrap()),
    }
}

/// The full application router (same middleware stack as production) over
/// the given store.
pub fn build_test_app_with(store: Arc<dyn Store>) -> Router {
    let config = test_config();
    let state = AppState::new(store, config.clone());
    build_app_router(state, &config)
}

/// The full application router over an empty in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(MemoryStore::new()))
}

/// A valid bearer token for the given identity.
pub fn token_for(user_id: i64, username: &str, role: &str) -> String {
    huecos_api::auth::jwt::generate_access_token(user_id, username, role, &test_config().jwt)
        .unwrap()
}

pub fn admin_token() -> String {
    token_for(1, "ilde", "admin")
}

pub fn operator_token() -> String {
    token_for(2, "maria", "operator")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("Authorization", format!("Bearer {token}")),
        None => builder,
    }
}

/// Send a GET request without credentials.
pub async fn get(app: Router, uri: &str) -> Response {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: String,
) -> Response {
    send(
        app,
        builder(method, uri, token)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

/// Send a POST request with a JSON body and no credentials.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send_json(app, Method::POST, uri, None, body.to_string()).await
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send_json(app, Method::POST, uri, Some(token), body.to_string()).await
}

/// Send a POST request with a raw (possibly malformed) body and a bearer token.
pub async fn post_raw_auth(app: Router, uri: &str, token: &str, body: &str) -> Response {
    send_json(app, Method::POST, uri, Some(token), body.to_string()).await
}

/// Send a PUT request with a JSON body and a bearer token.
pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send_json(app, Method::PUT, uri, Some(token), body.to_string()).await
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        builder(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in through the API and return the token.
pub async fn login_token(app: Router, username: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}
