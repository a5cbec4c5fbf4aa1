use std::net::SocketAddr;

use pos_gateway::{build_router, AppState, Operation, PosConfig, UserDirectory};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PosConfig::from_env()?;
    let addr = SocketAddr::from((config.host, config.port));

    for operation in Operation::ALL {
        info!(
            operation = operation.as_str(),
            url = config.webhooks.url(operation),
            "webhook configured"
        );
    }

    let users = UserDirectory::demo();
    info!(
        users = ?users.usernames().collect::<Vec<_>>(),
        shop = %config.shop.shop_name,
        environment = %config.environment,
        "demo accounts loaded"
    );

    let state = AppState::new(config, users)?;
    let app = build_router(state);

    info!(%addr, "starting pos-gateway");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
