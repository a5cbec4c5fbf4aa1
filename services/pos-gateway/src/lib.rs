pub mod app_state;
pub mod auth_handlers;
pub mod config;
pub mod dashboard_handlers;
pub mod fallback;
pub mod metrics;
pub mod payloads;
pub mod pos_handlers;
pub mod upstream;
pub mod users;

use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use chrono::{SecondsFormat, Utc};
use common_http_errors::{ApiError, ApiResult};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::app_state::AppState;
pub use crate::config::{PosConfig, ShopConfig, WebhookUrls};
pub use crate::metrics::GatewayMetrics;
pub use crate::upstream::{Envelope, Operation, UpstreamError, WebhookGateway};
pub use crate::users::{DemoUser, UserDirectory};

/// Full HTTP surface: `/api/*`, `/health` and `/metrics`.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(auth_handlers::logout))
        .route("/process-order", post(pos_handlers::process_order))
        .route("/update-inventory", post(pos_handlers::update_inventory))
        .route("/dashboard-stats", get(dashboard_handlers::dashboard_stats))
        .route("/low-stock", get(dashboard_handlers::low_stock))
        .route("/analytics", get(dashboard_handlers::analytics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_handlers::require_credential,
        ));

    let api = Router::new()
        .route("/auth/login", post(auth_handlers::login))
        .route("/get-settings", get(pos_handlers::get_settings))
        .route("/get-products", get(pos_handlers::get_products))
        .route("/health", get(health))
        .merge(protected);

    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        )
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION])
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since startup.
    pub uptime: f64,
    pub environment: String,
    pub version: &'static str,
    pub port: u16,
    pub ready: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        port: state.config.port,
        ready: true,
    })
}

async fn metrics(State(state): State<AppState>) -> ApiResult<Response> {
    state.metrics.render().map_err(ApiError::internal)
}
