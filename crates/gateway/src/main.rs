mod cli;
mod config;
mod handlers;
mod logging;
mod server;

use crate::cli::Args;
use crate::config::load_gateway_config;
use crate::handlers::Handlers;
use crate::logging::init_tracing;
use anyhow::Context;
use clap::Parser;
use sources::{build_http_client, PrefectClient, SageMakerClient};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_dir.as_deref(), args.log_to_stderr)?;

    info!(
        listen_addr = %args.listen_addr,
        config = %args.config.display(),
        "gateway starting"
    );
    let config = load_gateway_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    let http = build_http_client().context("failed to build http client")?;
    let prefect =
        PrefectClient::new(&config.prefect, http.clone()).context("invalid prefect config")?;
    let sagemaker =
        SageMakerClient::new(&config.sagemaker, http).context("invalid sagemaker config")?;
    info!(
        detail_concurrency = config.detail_concurrency,
        token = ?config.prefect.token,
        "upstream clients ready"
    );
    let handlers = Handlers::new(
        Arc::new(prefect),
        Arc::new(sagemaker),
        config.detail_concurrency,
    );
    let app = server::router(handlers);

    let listener = TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.listen_addr))?;
    info!(addr = %args.listen_addr, "gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    info!("gateway shutting down");
    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
