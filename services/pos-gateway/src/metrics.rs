use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    upstream_calls: IntCounterVec,
    fallbacks: IntCounterVec,
    login_attempts: IntCounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let upstream_calls = IntCounterVec::new(
            Opts::new(
                "pos_gateway_upstream_calls_total",
                "Webhook calls grouped by operation and result",
            ),
            &["operation", "result"],
        )?;
        let fallbacks = IntCounterVec::new(
            Opts::new(
                "pos_gateway_fallbacks_total",
                "Responses served from demo data grouped by operation and reason",
            ),
            &["operation", "reason"],
        )?;
        let login_attempts = IntCounterVec::new(
            Opts::new(
                "pos_gateway_login_attempts_total",
                "Login attempts grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(upstream_calls.clone()))?;
        registry.register(Box::new(fallbacks.clone()))?;
        registry.register(Box::new(login_attempts.clone()))?;
        Ok(Self {
            registry,
            upstream_calls,
            fallbacks,
            login_attempts,
        })
    }

    pub fn record_upstream_call(&self, operation: &str, result: &str) {
        self.upstream_calls
            .with_label_values(&[operation, result])
            .inc();
    }

    pub fn record_fallback(&self, operation: &str, reason: &str) {
        self.fallbacks.with_label_values(&[operation, reason]).inc();
    }

    pub fn login_attempt(&self, outcome: &str) {
        self.login_attempts.with_label_values(&[outcome]).inc();
    }

    pub fn fallback_count(&self, operation: &str, reason: &str) -> u64 {
        self.fallbacks.with_label_values(&[operation, reason]).get()
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
