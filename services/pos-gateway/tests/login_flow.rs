mod support;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use support::{app_for, get, login, post, send, UNREACHABLE};

#[tokio::test]
async fn admin_login_returns_token_and_profile() {
    let (app, _) = app_for(UNREACHABLE);
    let reply = send(
        &app,
        post(
            "/api/auth/login",
            None,
            json!({ "username": "admin", "password": "admin123" }),
        ),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
    assert_eq!(reply.body["message"], "Login successful");
    assert_eq!(reply.body["user"]["id"], 1);
    assert_eq!(reply.body["user"]["role"], "admin");
    assert_eq!(reply.body["user"]["name"], "Administrator");
    assert!(reply.body["user"].get("password").is_none());
    assert_eq!(reply.body["token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn issued_token_opens_protected_routes() {
    let (app, state) = app_for(UNREACHABLE);
    let token = login(&app, "manager", "manager123").await;

    let credential = state.token_codec.verify(&token).unwrap();
    assert_eq!(credential.username, "manager");
    assert_eq!(credential.id, 3);

    let reply = send(&app, get("/api/dashboard-stats", Some(&token))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
}

#[tokio::test]
async fn missing_credentials_is_bad_request() {
    let (app, state) = app_for(UNREACHABLE);
    for body in [
        json!({}),
        json!({ "username": "admin" }),
        json!({ "username": "", "password": "admin123" }),
    ] {
        let reply = send(&app, post("/api/auth/login", None, body)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["success"], false);
        assert_eq!(reply.body["code"], "missing_credentials");
    }
    let rendered = String::from_utf8(
        axum::body::to_bytes(state.metrics.render().unwrap().into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();
    assert!(rendered.contains(r#"pos_gateway_login_attempts_total{outcome="missing_credentials"} 3"#));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _) = app_for(UNREACHABLE);
    let reply = send(
        &app,
        post(
            "/api/auth/login",
            None,
            json!({ "username": "admin", "password": "staff123" }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["code"], "invalid_credentials");
    assert_eq!(reply.headers["x-error-code"], "invalid_credentials");
}

#[tokio::test]
async fn protected_route_without_header_is_401() {
    let (app, _) = app_for(UNREACHABLE);
    let reply = send(&app, get("/api/low-stock", None)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["success"], false);
    assert_eq!(reply.body["code"], "missing_token");
}

#[tokio::test]
async fn garbage_token_is_403() {
    let (app, _) = app_for(UNREACHABLE);
    let reply = send(&app, get("/api/dashboard-stats", Some("x.y.z"))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["code"], "invalid_signature");

    let reply = send(&app, get("/api/dashboard-stats", Some("not-a-token"))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["code"], "malformed_token");
}

#[tokio::test]
async fn expired_token_is_403() {
    let (app, state) = app_for(UNREACHABLE);
    let user = state.users.authenticate("staff", "staff123").unwrap();
    let token = state
        .token_codec
        .issue_with_expiry(&user.subject(), Utc::now().timestamp() - 5)
        .unwrap();

    let reply = send(&app, get("/api/low-stock", Some(&token))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["code"], "token_expired");
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let (app, state) = app_for(UNREACHABLE);
    let foreign = common_auth::TokenCodec::new(common_auth::TokenConfig::new(
        b"some-other-secret".to_vec(),
    ));
    let user = state.users.authenticate("admin", "admin123").unwrap();
    let token = foreign.issue(&user.subject()).unwrap();

    let reply = send(&app, get("/api/analytics", Some(&token))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["code"], "invalid_signature");
}

#[tokio::test]
async fn logout_requires_token_and_acknowledges() {
    let (app, _) = app_for(UNREACHABLE);
    let reply = send(&app, post("/api/auth/logout", None, json!({}))).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let token = login(&app, "staff", "staff123").await;
    let reply = send(&app, post("/api/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
    assert_eq!(reply.body["message"], "Logged out successfully");

    // Stateless: the token still verifies after logout.
    let reply = send(&app, get("/api/dashboard-stats", Some(&token))).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn catalog_routes_are_public() {
    let (app, _) = app_for(UNREACHABLE);
    for path in ["/api/get-settings", "/api/get-products"] {
        let reply = send(&app, get(path, None)).await;
        assert_eq!(reply.status, StatusCode::OK, "{path}");
        assert_eq!(reply.body["success"], true);
    }
}

#[tokio::test]
async fn malformed_login_body_gets_error_envelope() {
    let (app, _) = app_for(UNREACHABLE);
    for body in [json!({ "username": 7, "password": "admin123" }), json!(["admin"])] {
        let reply = send(&app, post("/api/auth/login", None, body)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["success"], false);
        assert_eq!(reply.body["code"], "invalid_json");
    }
}
