use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use chrono::{SecondsFormat, Utc};
use common_auth::Credential;
use common_http_errors::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::fallback;
use crate::payloads::JsonObject;
use crate::upstream::{Envelope, Operation};
use crate::AppState;

pub async fn get_settings(State(state): State<AppState>) -> Envelope<JsonObject> {
    state
        .gateway
        .fetch_or_fallback(Operation::GetSettings, || fallback::settings(&state.config.shop))
        .await
}

pub async fn get_products(State(state): State<AppState>) -> Envelope<JsonObject> {
    state
        .gateway
        .fetch_or_fallback(Operation::GetProducts, || fallback::products(Utc::now()))
        .await
}

/// Fields stamped by the gateway; client-supplied copies are replaced.
const CASHIER: &str = "cashier";
const CASHIER_ID: &str = "cashierId";
const TIMESTAMP: &str = "timestamp";

/// The order is whatever JSON object the client built. It is forwarded
/// verbatim apart from the cashier stamp; nothing is priced or checked
/// against stock here.
pub async fn process_order(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    payload: Result<Json<JsonObject>, JsonRejection>,
) -> ApiResult<Envelope<JsonObject>> {
    let Json(mut order) = payload?;
    let total = order.get("total").cloned();
    info!(
        items = order.get("items").and_then(serde_json::Value::as_array).map_or(0, Vec::len),
        total = ?total,
        payment_method = order.get("paymentMethod").and_then(serde_json::Value::as_str).unwrap_or("-"),
        cashier = %credential.username,
        "processing order"
    );

    order.insert(CASHIER.into(), Value::from(credential.username.clone()));
    order.insert(CASHIER_ID.into(), Value::from(credential.id));
    order.insert(
        TIMESTAMP.into(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    let fallback_total = total.clone();
    Ok(state
        .gateway
        .call_or_fallback(Operation::ProcessOrder, Some(&order), || {
            fallback::order_receipt(fallback_total, Utc::now())
        })
        .await
        .map(|mut receipt| {
            if let Some(total) = total {
                receipt.entry("total").or_insert(total);
            }
            receipt
        }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    #[serde(default)]
    pub product_id: Option<Value>,
    #[serde(default)]
    pub new_stock: Option<Value>,
}

impl InventoryRequest {
    /// Sheet ids arrive as strings or numbers.
    fn product_id(&self) -> Option<String> {
        match &self.product_id {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Whole numbers, also accepted as numeric strings.
    fn new_stock(&self) -> Option<i64> {
        match &self.new_stock {
            Some(Value::Number(stock)) => stock.as_i64(),
            Some(Value::String(stock)) => stock.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockUpdateBatch {
    stock_updates: Vec<StockUpdate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockUpdate {
    product_id: String,
    new_stock: i64,
    update_type: &'static str,
    reason: &'static str,
    updated_by: String,
}

pub async fn update_inventory(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    payload: Result<Json<InventoryRequest>, JsonRejection>,
) -> ApiResult<Envelope<JsonObject>> {
    let Json(req) = payload?;
    let (Some(product_id), Some(new_stock)) = (req.product_id(), req.new_stock()) else {
        return Err(ApiError::bad_request(
            "missing_stock_fields",
            "Product ID and new stock level required",
        ));
    };

    let batch = StockUpdateBatch {
        stock_updates: vec![StockUpdate {
            product_id,
            new_stock,
            update_type: "manual",
            reason: "Admin stock adjustment",
            updated_by: credential.username.clone(),
        }],
    };

    Ok(state
        .gateway
        .call_or_fallback(Operation::UpdateStock, Some(&batch), fallback::inventory_update)
        .await)
}
