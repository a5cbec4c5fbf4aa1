use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::WebhookUrls;
use crate::metrics::GatewayMetrics;
use crate::payloads::{into_object, JsonObject};

/// Logical backend operations, each bound to one webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetSettings,
    GetProducts,
    ProcessOrder,
    UpdateStock,
    DashboardStats,
    LowStock,
    Analytics,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::GetSettings,
        Operation::GetProducts,
        Operation::ProcessOrder,
        Operation::UpdateStock,
        Operation::DashboardStats,
        Operation::LowStock,
        Operation::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetSettings => "get_settings",
            Operation::GetProducts => "get_products",
            Operation::ProcessOrder => "process_order",
            Operation::UpdateStock => "update_stock",
            Operation::DashboardStats => "dashboard_stats",
            Operation::LowStock => "low_stock",
            Operation::Analytics => "analytics",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Operation::ProcessOrder | Operation::UpdateStock => Method::POST,
            _ => Method::GET,
        }
    }

    /// Path segment used when deriving URLs from a base.
    pub fn default_path(&self) -> &'static str {
        match self {
            Operation::GetSettings => "get-settings",
            Operation::GetProducts => "get-products",
            Operation::ProcessOrder => "process-order",
            Operation::UpdateStock => "update-stock",
            Operation::DashboardStats => "dashboard-stats",
            Operation::LowStock => "low-stock",
            Operation::Analytics => "analytics",
        }
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("webhook unreachable: {0}")]
    Unreachable(String),
    #[error("webhook returned HTTP {0}")]
    HttpError(u16),
    #[error("webhook returned a non-object or non-JSON body: {0}")]
    BadPayload(String),
    #[error("webhook reported success=false")]
    Rejected,
}

impl UpstreamError {
    /// Metric/log label.
    pub fn reason(&self) -> &'static str {
        match self {
            UpstreamError::Unreachable(_) => "unreachable",
            UpstreamError::HttpError(_) => "http_error",
            UpstreamError::BadPayload(_) => "bad_payload",
            UpstreamError::Rejected => "rejected",
        }
    }
}

/// Result of one gateway operation. Both variants reach the client as
/// `{"success": true, ...payload}`.
#[derive(Debug)]
pub enum Envelope<T> {
    Upstream(T),
    Fallback { payload: T, reason: UpstreamError },
}

impl<T> Envelope<T> {
    pub fn payload(&self) -> &T {
        match self {
            Envelope::Upstream(payload) | Envelope::Fallback { payload, .. } => payload,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        match self {
            Envelope::Upstream(payload) => Envelope::Upstream(f(payload)),
            Envelope::Fallback { payload, reason } => Envelope::Fallback {
                payload: f(payload),
                reason,
            },
        }
    }
}

#[derive(Serialize)]
struct SuccessBody<'a, T> {
    success: bool,
    #[serde(flatten)]
    payload: &'a T,
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(SuccessBody {
            success: true,
            payload: self.payload(),
        })
        .into_response()
    }
}

/// Forwards operations to their webhooks. One outbound call per operation,
/// no retries.
#[derive(Clone)]
pub struct WebhookGateway {
    client: Client,
    urls: Arc<WebhookUrls>,
    metrics: Arc<GatewayMetrics>,
}

impl WebhookGateway {
    pub fn new(
        urls: WebhookUrls,
        timeout: Option<Duration>,
        metrics: Arc<GatewayMetrics>,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            urls: Arc::new(urls),
            metrics,
        })
    }

    /// Issue the call and return the `{success: true, ...}` body without its
    /// flag. GET data goes on the query string, anything else as a JSON body.
    pub async fn call<B>(&self, operation: Operation, data: Option<&B>) -> Result<JsonObject, UpstreamError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.urls.url(operation);
        let method = operation.method();
        let started = Instant::now();

        let mut request = self.client.request(method.clone(), url);
        if let Some(data) = data {
            request = if method == Method::GET {
                request.query(data)
            } else {
                request.json(data)
            };
        }

        let result = Self::exchange(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let label = match &result {
            Ok(_) => "ok",
            Err(err) => err.reason(),
        };
        self.metrics.record_upstream_call(operation.as_str(), label);
        debug!(
            operation = operation.as_str(),
            %method,
            url,
            elapsed_ms,
            result = label,
            "webhook call finished"
        );
        result
    }

    async fn exchange(request: reqwest::RequestBuilder) -> Result<JsonObject, UpstreamError> {
        let response = request
            .send()
            .await
            .map_err(|err| UpstreamError::Unreachable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::HttpError(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| UpstreamError::Unreachable(err.to_string()))?;
        decode_success(&bytes)
    }

    /// `call_or_fallback` without request data.
    pub async fn fetch_or_fallback<P, F>(&self, operation: Operation, fallback: F) -> Envelope<JsonObject>
    where
        P: Serialize,
        F: FnOnce() -> P,
    {
        self.call_or_fallback(operation, None::<&()>, fallback).await
    }

    /// `call`, substituting the demo payload from `fallback()` on any
    /// failure. The substitution is logged and counted.
    pub async fn call_or_fallback<P, B, F>(
        &self,
        operation: Operation,
        data: Option<&B>,
        fallback: F,
    ) -> Envelope<JsonObject>
    where
        P: Serialize,
        B: Serialize + ?Sized,
        F: FnOnce() -> P,
    {
        match self.call(operation, data).await {
            Ok(payload) => Envelope::Upstream(payload),
            Err(reason) => {
                warn!(
                    operation = operation.as_str(),
                    reason = reason.reason(),
                    error = %reason,
                    "webhook unavailable; serving demo data"
                );
                self.metrics
                    .record_fallback(operation.as_str(), reason.reason());
                Envelope::Fallback {
                    payload: into_object(fallback()),
                    reason,
                }
            }
        }
    }
}

/// Parse an upstream body: must be a JSON object with `success: true`.
/// Everything else in it is relayed untouched; only the flag is stripped so
/// it is not duplicated when re-enveloped.
fn decode_success(bytes: &[u8]) -> Result<JsonObject, UpstreamError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| UpstreamError::BadPayload(err.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(UpstreamError::BadPayload("expected a JSON object".into()));
    };
    match object.remove("success") {
        Some(Value::Bool(true)) => Ok(object),
        _ => Err(UpstreamError::Rejected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_requires_success_true() {
        let err = decode_success(br#"{"success":false,"message":"sheet locked"}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::Rejected));
        let err = decode_success(br#"{"message":"no flag"}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::Rejected));
        let err = decode_success(br#"{"success":"true"}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::Rejected));
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert!(matches!(
            decode_success(b"<html>oops</html>"),
            Err(UpstreamError::BadPayload(_))
        ));
        assert!(matches!(
            decode_success(b"[1,2,3]"),
            Err(UpstreamError::BadPayload(_))
        ));
    }

    #[test]
    fn decode_relays_fields_verbatim() {
        let object = decode_success(
            br#"{"success":true,"settings":{"shopName":"Bean There","phone":9171234567,"email":null}}"#,
        )
        .unwrap();
        assert!(!object.contains_key("success"));
        assert_eq!(
            Value::Object(object),
            json!({ "settings": { "shopName": "Bean There", "phone": 9171234567u64, "email": null } })
        );
    }

    #[tokio::test]
    async fn envelope_variants_serialize_identically() {
        use http_body_util::BodyExt;

        let payload = || into_object(json!({ "message": "done" }));
        let upstream = Envelope::Upstream(payload()).into_response();
        let fallback = Envelope::Fallback {
            payload: payload(),
            reason: UpstreamError::Rejected,
        }
        .into_response();

        let a = upstream.into_body().collect().await.unwrap().to_bytes();
        let b = fallback.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(a, b);
        let json: Value = serde_json::from_slice(&a).unwrap();
        assert_eq!(json, json!({ "success": true, "message": "done" }));
    }

    #[test]
    fn every_operation_has_distinct_label() {
        let labels: std::collections::HashSet<_> =
            Operation::ALL.iter().map(Operation::as_str).collect();
        assert_eq!(labels.len(), Operation::ALL.len());
    }
}
