use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use notekeeper_api::server::{app, AppState};
use notekeeper_api::store::MemoryStore;

/// Builds a fresh application over an empty in-memory store.
pub fn test_app() -> Router {
    app(AppState::new(Arc::new(MemoryStore::new())))
}

/// Sends a request with an optional session cookie and JSON body.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Result<Response<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    Ok(app.clone().oneshot(request).await?)
}

/// Reads the response body as JSON.
pub async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    serde_json::from_slice(&bytes).context("response body was not JSON")
}

/// Extracts the `name=value` pair of the session cookie from Set-Cookie.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

/// Registers a user and returns their session cookie.
pub async fn register_user(app: &Router, username: &str, email: &str) -> Result<String> {
    let response = send_json(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": email,
            "password": "password1",
        })),
    )
    .await?;

    anyhow::ensure!(
        response.status() == StatusCode::CREATED,
        "registration of {} failed: {}",
        username,
        response.status()
    );

    session_cookie(&response).context("no session cookie set on registration")
}
