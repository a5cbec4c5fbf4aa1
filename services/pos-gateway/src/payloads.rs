//! Demo payload shapes. Upstream replies are relayed as raw JSON objects;
//! these types only describe what the gateway builds itself when it has to
//! answer without n8n.

use serde::Serialize;
use serde_json::{Map, Value};

/// A JSON object as relayed to the client, minus the `success` flag.
pub type JsonObject = Map<String, Value>;

/// Serialize a demo payload into the object form upstream replies use.
pub fn into_object<T: Serialize>(payload: T) -> JsonObject {
    match serde_json::to_value(payload) {
        Ok(Value::Object(object)) => object,
        _ => JsonObject::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsPayload {
    pub settings: ShopSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    pub shop_name: String,
    pub shop_tagline: String,
    pub logo_emoji: String,
    pub currency: String,
    pub tax_rate: f64,
    pub low_stock_threshold: i64,
    pub enable_ingredient_tracking: bool,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsPayload {
    pub products: Vec<Product>,
    pub last_update: String,
    pub total_products: u64,
    pub active_products: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub is_active: bool,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    /// Copied from the order as sent, whatever its JSON type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Value>,
    pub message: String,
    pub low_stock_alert: bool,
    pub low_stock_count: u64,
    pub email_sent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryUpdate {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub stats: SalesStats,
    pub chart_data: ChartData,
    pub alerts: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub today_sales: f64,
    pub today_orders: u64,
    pub avg_order: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub sales: Series,
    pub products: Series,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockReport {
    pub low_stock_items: Vec<Value>,
    pub summary: LowStockSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LowStockSummary {
    pub total: u64,
    pub critical: u64,
    pub warning: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub analytics: Analytics,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub avg_order_value: f64,
    pub top_products: Vec<TopProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    pub name: String,
    pub quantity: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn receipt_omits_missing_total_and_keeps_its_type() {
        let receipt = OrderReceipt {
            order_id: "ORD-1".into(),
            total: None,
            message: "ok".into(),
            low_stock_alert: false,
            low_stock_count: 0,
            email_sent: false,
        };
        let object = into_object(&receipt);
        assert!(!object.contains_key("total"));
        assert_eq!(object["orderId"], "ORD-1");

        let object = into_object(OrderReceipt {
            total: Some(json!("268.80")),
            ..receipt
        });
        assert_eq!(object["total"], json!("268.80"));
    }

    #[test]
    fn wire_names_are_camel_case() {
        let object = into_object(LowStockReport {
            low_stock_items: Vec::new(),
            summary: LowStockSummary::default(),
        });
        assert_eq!(
            Value::Object(object),
            json!({ "lowStockItems": [], "summary": { "total": 0, "critical": 0, "warning": 0 } })
        );
    }

    #[test]
    fn non_object_payloads_become_empty() {
        assert!(into_object(vec![1, 2, 3]).is_empty());
    }
}
