//! MCP server entrypoint (stdio transport).
//!
//! Exposes the same tool catalog as the HTTP binary to editor and agent hosts that spawn the
//! server as a child process. Logs go to the log file only; stdout carries the protocol.
use anyhow::{Context, Result};
use rmcp::{service::ServiceExt, transport::stdio};
use sitemcp::{config, credentials::CredentialStore, logging, mcp::Dispatcher, mcp::SiteMcpServer};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load().context("failed to load configuration")?;
    logging::init_tracing(false);

    let credentials =
        Arc::new(CredentialStore::load(&config).context("failed to load access token")?);
    let dispatcher = Arc::new(
        Dispatcher::from_config(&config, credentials).context("failed to build search client")?,
    );
    let server = SiteMcpServer::new(dispatcher);

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
