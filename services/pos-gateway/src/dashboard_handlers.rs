use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fallback;
use crate::payloads::JsonObject;
use crate::upstream::{Envelope, Operation};
use crate::AppState;

pub async fn dashboard_stats(State(state): State<AppState>) -> Envelope<JsonObject> {
    state
        .gateway
        .fetch_or_fallback(Operation::DashboardStats, fallback::dashboard_stats)
        .await
}

pub async fn low_stock(State(state): State<AppState>) -> Envelope<JsonObject> {
    state
        .gateway
        .fetch_or_fallback(Operation::LowStock, fallback::low_stock)
        .await
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    "7d".to_string()
}

pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Envelope<JsonObject> {
    let period = query.period.clone();
    state
        .gateway
        .call_or_fallback(Operation::Analytics, Some(&query), || {
            fallback::analytics(&period)
        })
        .await
        .map(|mut report| {
            let echoed = match report.get("period") {
                Some(Value::String(p)) => !p.is_empty(),
                Some(Value::Null) | None => false,
                Some(_) => true,
            };
            if !echoed {
                report.insert("period".into(), Value::String(period.clone()));
            }
            report
        })
}
