#![allow(dead_code)]

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pos_gateway::{build_router, AppState, PosConfig, UserDirectory};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Nothing listens on port 1, so every webhook call fails fast.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub fn state_for(n8n_base: &str) -> AppState {
    let vars: HashMap<&str, String> = HashMap::from([
        ("JWT_SECRET", "integration-test-secret".to_string()),
        ("N8N_BASE_URL", n8n_base.to_string()),
        ("UPSTREAM_TIMEOUT_SECONDS", "5".to_string()),
        ("NODE_ENV", "test".to_string()),
    ]);
    let config = PosConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
    AppState::new(config, UserDirectory::demo()).unwrap()
}

pub fn app_for(n8n_base: &str) -> (Router, AppState) {
    let state = state_for(n8n_base);
    (build_router(state.clone()), state)
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    Reply {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let reply = send(
        app,
        post(
            "/api/auth/login",
            None,
            json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.body["token"].as_str().unwrap().to_string()
}
