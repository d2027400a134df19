//! Implementation of the `projectgpt serve` command.

use anyhow::{anyhow, Context, Result};
use clap::Args;

use super::build_pipeline;
use crate::adapters::web::{AppState, WebServer};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, config: &Config) -> Result<()> {
    let mut server_config = config.server.clone();
    if let Some(host) = args.host {
        server_config.host = host;
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }

    let pipeline = build_pipeline(config)?;
    let state = AppState::new(pipeline).context("Failed to load page templates")?;

    WebServer::new(state, server_config)
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("Web server failed: {e}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
