use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use common_auth::TokenCodec;

use crate::config::PosConfig;
use crate::metrics::GatewayMetrics;
use crate::upstream::WebhookGateway;
use crate::users::UserDirectory;

/// Shared, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PosConfig>,
    pub token_codec: Arc<TokenCodec>,
    pub users: Arc<UserDirectory>,
    pub gateway: WebhookGateway,
    pub metrics: Arc<GatewayMetrics>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: PosConfig, users: UserDirectory) -> anyhow::Result<Self> {
        let metrics = Arc::new(GatewayMetrics::new()?);
        let gateway = WebhookGateway::new(
            config.webhooks.clone(),
            config.upstream_timeout,
            metrics.clone(),
        )?;
        let token_codec = Arc::new(TokenCodec::new(config.token.clone()));
        Ok(Self {
            config: Arc::new(config),
            token_codec,
            users: Arc::new(users),
            gateway,
            metrics,
            started_at: Instant::now(),
        })
    }
}

impl FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.token_codec.clone()
    }
}
