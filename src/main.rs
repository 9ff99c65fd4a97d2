use std::sync::Arc;

use anyhow::Result;
use axum::serve;
use dotenv::dotenv;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod mcp;
use mcp::{
    config::{BreatheConfig, LogFormat},
    gateway,
    http::BreatheClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load variables from .env file if it exists into the environment
    dotenv().ok();

    let config = BreatheConfig::from_env()?;

    // Initialize tracing
    let json_logs = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    if config.api_key.is_none() {
        warn!("BREATHE_HR_API_KEY is not set; every tool call will fail until it is configured");
    }
    if config.mcp_api_key.is_some() {
        info!("MCP_API_KEY is set; /mcp requires a bearer token");
    }

    // Setting up the Streamable HTTP Service backed by one shared API client
    info!(base_url = %config.base_url, "Setting up the Breathe HR MCP service");
    let client = Arc::new(BreatheClient::new(&config)?);
    let router = gateway::router(&config, client);

    // Starting the server... Setting up the TCP listener
    info!("Starting server on {}", config.bind_address);
    let tcp_listener = TcpListener::bind(&config.bind_address).await?;

    // Graceful shutdown on CTRL+C
    let shutdown = async {
        signal::ctrl_c().await.unwrap_or_else(|e| {
            eprintln!("failed to install CTRL+C handler: {e}");
        });
        info!("Shutting down");
    };

    // Finally start the server with graceful shutdown
    serve(tcp_listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
