use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kintone_oauth_axum::{CallbackConfig, CallbackService, kintone_oauth_router};

mod server;

use crate::server::{listen_port, spawn_http_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,kintone_oauth=debug,tower_http=info", env!("CARGO_CRATE_NAME"))
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CallbackConfig::from_env()?;
    config.log_summary();

    let service = CallbackService::from_config(&config)?;
    let app = kintone_oauth_router(Arc::new(service), &config.callback_route);

    let http_server = spawn_http_server(listen_port()?, app);

    tokio::select! {
        result = http_server => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }
    Ok(())
}
