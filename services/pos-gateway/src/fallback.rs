//! Demo payloads served when a webhook cannot be used.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::config::ShopConfig;
use crate::payloads::{
    Analytics, AnalyticsReport, ChartData, DashboardStats, InventoryUpdate, LowStockReport,
    LowStockSummary, OrderReceipt, Product, ProductsPayload, SalesStats, Series, SettingsPayload,
    ShopSettings, TopProduct,
};

pub fn settings(shop: &ShopConfig) -> SettingsPayload {
    SettingsPayload {
        settings: ShopSettings {
            shop_name: shop.shop_name.clone(),
            shop_tagline: "Fresh Coffee Daily".to_string(),
            logo_emoji: "☕".to_string(),
            currency: shop.currency.clone(),
            tax_rate: shop.tax_rate,
            low_stock_threshold: 10,
            enable_ingredient_tracking: true,
            address: "123 Coffee Street, Manila".to_string(),
            phone: "+63 917 123 4567".to_string(),
            email: "info@coffeeparadise.ph".to_string(),
        },
    }
}

pub fn products(now: DateTime<Utc>) -> ProductsPayload {
    let products = demo_products();
    let count = products.len() as u64;
    ProductsPayload {
        products,
        last_update: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        total_products: count,
        active_products: count,
    }
}

/// id, name, description, price, category, image, stock, cost
const DEMO_PRODUCTS: [(&str, &str, &str, f64, &str, &str, i64, f64); 3] = [
    ("espresso-single", "Single Espresso", "Rich, bold shot", 65.0, "Coffee - Espresso", "☕", 50, 18.50),
    ("americano", "Americano", "Espresso with hot water", 85.0, "Coffee - Espresso", "☕", 45, 22.00),
    ("latte", "Latte", "Espresso with steamed milk", 120.0, "Coffee - Milk Based", "🥛", 30, 35.50),
];

fn demo_products() -> Vec<Product> {
    DEMO_PRODUCTS
        .iter()
        .map(|&(id, name, description, price, category, image, stock, cost)| Product {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
            image: image.to_string(),
            stock,
            low_stock_threshold: 10,
            is_active: true,
            cost,
        })
        .collect()
}

/// Locally generated receipt: `ORD-<epoch millis>`.
pub fn order_receipt(total: Option<Value>, now: DateTime<Utc>) -> OrderReceipt {
    OrderReceipt {
        order_id: format!("ORD-{}", now.timestamp_millis()),
        total,
        message: "Order processed successfully (demo mode)".to_string(),
        low_stock_alert: false,
        low_stock_count: 0,
        email_sent: false,
    }
}

pub fn inventory_update() -> InventoryUpdate {
    InventoryUpdate {
        message: "Inventory updated successfully (demo mode)".to_string(),
    }
}

pub fn dashboard_stats() -> DashboardStats {
    let labels = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
    DashboardStats {
        stats: SalesStats {
            today_sales: 15750.0,
            today_orders: 42,
            avg_order: 375.0,
            profit_margin: 68.0,
        },
        chart_data: ChartData {
            sales: Series {
                labels: labels(&["9AM", "10AM", "11AM", "12PM", "1PM", "2PM", "3PM"]),
                data: vec![1200.0, 1800.0, 2400.0, 3200.0, 2800.0, 2200.0, 2100.0],
            },
            products: Series {
                labels: labels(&["Latte", "Americano", "Cappuccino", "Espresso", "Mocha"]),
                data: vec![15.0, 12.0, 10.0, 8.0, 7.0],
            },
        },
        alerts: Vec::new(),
    }
}

pub fn low_stock() -> LowStockReport {
    LowStockReport {
        low_stock_items: Vec::new(),
        summary: LowStockSummary::default(),
    }
}

pub fn analytics(period: &str) -> AnalyticsReport {
    let top = |name: &str, quantity| TopProduct {
        name: name.to_string(),
        quantity,
    };
    AnalyticsReport {
        analytics: Analytics {
            total_revenue: 35000.0,
            total_orders: 95,
            avg_order_value: 368.0,
            top_products: vec![top("Latte", 25), top("Americano", 20), top("Cappuccino", 18)],
        },
        period: period.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_counts_match_list() {
        let payload = products(Utc::now());
        assert_eq!(payload.total_products, payload.products.len() as u64);
        assert_eq!(payload.active_products, 3);
        assert!(payload.products.iter().all(|p| p.is_active));
    }

    #[test]
    fn order_id_uses_millis() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T08:00:00.123Z")
            .unwrap()
            .with_timezone(&Utc);
        let receipt = order_receipt(Some(Value::from(150.0)), now);
        assert_eq!(receipt.order_id, format!("ORD-{}", now.timestamp_millis()));
        assert_eq!(receipt.total, Some(Value::from(150.0)));
    }

    #[test]
    fn settings_follow_shop_config() {
        let shop = ShopConfig {
            shop_name: "Bean There".into(),
            currency: "USD".into(),
            tax_rate: 0.08,
        };
        let payload = settings(&shop);
        assert_eq!(payload.settings.shop_name, "Bean There");
        assert_eq!(payload.settings.currency, "USD");
        assert_eq!(payload.settings.low_stock_threshold, 10);
    }
}
