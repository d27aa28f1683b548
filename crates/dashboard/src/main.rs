mod cli;
mod config;
mod error;
mod server;
mod views;

use crate::cli::Args;
use crate::config::load_dashboard_config;
use anyhow::Context;
use clap::Parser;
use sources::{build_http_client, GatewayClient};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_to_stderr)?;

    info!(
        listen_addr = %args.listen_addr,
        config = %args.config.display(),
        "dashboard starting"
    );
    let config = load_dashboard_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    let http = build_http_client().context("failed to build http client")?;
    let gateway = GatewayClient::new(config.gateway_url.trim(), http);
    let app = server::router(gateway);

    let listener = TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.listen_addr))?;
    info!(addr = %args.listen_addr, gateway = %config.gateway_url, "dashboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    info!("dashboard shutting down");
    Ok(())
}

fn init_tracing(log_to_stderr: bool) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
    );
    if log_to_stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
