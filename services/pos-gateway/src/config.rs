use anyhow::{anyhow, Context, Result};
use common_auth::config::DEFAULT_TTL_SECONDS;
use common_auth::TokenConfig;
use rand::rngs::OsRng;
use rand::RngCore;
use std::env;
use std::net::IpAddr;
use std::time::Duration;
use tracing::warn;

use crate::upstream::Operation;

const DEFAULT_N8N_BASE_URL: &str = "http://localhost:5678";

#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub shop_name: String,
    pub currency: String,
    pub tax_rate: f64,
}

/// One webhook URL per upstream operation.
#[derive(Debug, Clone)]
pub struct WebhookUrls {
    pub get_settings: String,
    pub get_products: String,
    pub process_order: String,
    pub update_stock: String,
    pub dashboard_stats: String,
    pub low_stock: String,
    pub analytics: String,
}

impl WebhookUrls {
    /// Every operation at `<base>/webhook/<path>`.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let url = |op: Operation| format!("{base}/webhook/{}", op.default_path());
        Self {
            get_settings: url(Operation::GetSettings),
            get_products: url(Operation::GetProducts),
            process_order: url(Operation::ProcessOrder),
            update_stock: url(Operation::UpdateStock),
            dashboard_stats: url(Operation::DashboardStats),
            low_stock: url(Operation::LowStock),
            analytics: url(Operation::Analytics),
        }
    }

    pub fn url(&self, operation: Operation) -> &str {
        match operation {
            Operation::GetSettings => &self.get_settings,
            Operation::GetProducts => &self.get_products,
            Operation::ProcessOrder => &self.process_order,
            Operation::UpdateStock => &self.update_stock,
            Operation::DashboardStats => &self.dashboard_stats,
            Operation::LowStock => &self.low_stock,
            Operation::Analytics => &self.analytics,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PosConfig {
    pub host: IpAddr,
    pub port: u16,
    pub environment: String,
    pub shop: ShopConfig,
    pub token: TokenConfig,
    pub webhooks: WebhookUrls,
    pub upstream_timeout: Option<Duration>,
    pub allowed_origins: Vec<String>,
}

impl PosConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr = lookup("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse()
            .context("HOST must be an IP address")?;
        let port = match lookup("PORT").or_else(|| lookup("RAILWAY_PORT")) {
            Some(raw) => raw.parse::<u16>().context("PORT must be a valid port number")?,
            None => 3000,
        };
        let environment = lookup("NODE_ENV").unwrap_or_else(|| "development".to_string());

        let tax_rate = match lookup("TAX_RATE") {
            Some(raw) => raw.parse::<f64>().context("TAX_RATE must be a number")?,
            None => 0.12,
        };
        if !(0.0..1.0).contains(&tax_rate) {
            return Err(anyhow!("TAX_RATE must be in [0, 1), got {tax_rate}"));
        }
        let shop = ShopConfig {
            shop_name: lookup("SHOP_NAME").unwrap_or_else(|| "Coffee Paradise".to_string()),
            currency: lookup("CURRENCY").unwrap_or_else(|| "PHP".to_string()),
            tax_rate,
        };

        let secret = match lookup("JWT_SECRET").filter(|value| !value.is_empty()) {
            Some(secret) => secret.into_bytes(),
            None => {
                warn!("JWT_SECRET not set; generated an ephemeral secret, tokens will not survive a restart");
                random_secret().into_bytes()
            }
        };
        let ttl_seconds = match lookup("TOKEN_TTL_SECONDS") {
            Some(raw) => raw
                .parse::<i64>()
                .context("TOKEN_TTL_SECONDS must be an integer")?,
            None => DEFAULT_TTL_SECONDS,
        };
        if ttl_seconds <= 0 {
            return Err(anyhow!("TOKEN_TTL_SECONDS must be positive"));
        }
        let token = TokenConfig::new(secret).with_ttl(ttl_seconds);

        let base = lookup("N8N_BASE_URL").unwrap_or_else(|| DEFAULT_N8N_BASE_URL.to_string());
        let defaults = WebhookUrls::from_base(&base);
        let webhooks = WebhookUrls {
            get_settings: lookup("N8N_GET_SETTINGS_WEBHOOK").unwrap_or(defaults.get_settings),
            get_products: lookup("N8N_GET_PRODUCTS_WEBHOOK").unwrap_or(defaults.get_products),
            process_order: lookup("N8N_PROCESS_ORDER_WEBHOOK").unwrap_or(defaults.process_order),
            update_stock: lookup("N8N_UPDATE_STOCK_WEBHOOK").unwrap_or(defaults.update_stock),
            dashboard_stats: lookup("N8N_DASHBOARD_STATS_WEBHOOK")
                .unwrap_or(defaults.dashboard_stats),
            low_stock: lookup("N8N_LOW_STOCK_WEBHOOK").unwrap_or(defaults.low_stock),
            analytics: lookup("N8N_ANALYTICS_WEBHOOK").unwrap_or(defaults.analytics),
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECONDS") {
            Some(raw) => Some(Duration::from_secs(
                raw.parse::<u64>()
                    .context("UPSTREAM_TIMEOUT_SECONDS must be an integer")?,
            )),
            None => None,
        };

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|csv| {
                csv.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        Ok(Self {
            host,
            port,
            environment,
            shop,
            token,
            webhooks,
            upstream_timeout,
            allowed_origins,
        })
    }
}

fn random_secret() -> String {
    let mut bytes = [0u8; 64];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
