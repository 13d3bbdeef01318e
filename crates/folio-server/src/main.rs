mod api;
mod config;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::api::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in deployment.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    info!("folio v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config).context("building upstream client")?;
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(%addr, upstream = %config.api_url, "proxy listening");
    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
