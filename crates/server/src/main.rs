//! mcp-shop server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol
//! on stdout. The shared browser process is started lazily by the first
//! scrape and shut down when the transport ends.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = cartscout_core::AppConfig::load()?;
    let engine = Arc::new(cartscout_client::ScrapeEngine::new(&config));

    tracing::info!("Starting mcp-shop server on stdio transport");

    let handler = handler::ShopServer::new(Arc::clone(&engine));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    engine.close().await;

    Ok(())
}
