use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sitemcp::{
    api::{self, AppState},
    config, logging,
    credentials::CredentialStore,
    mcp::Dispatcher,
};
use tokio::net::TcpListener;

/// Serve the site MCP endpoint over HTTP.
#[derive(Debug, Parser)]
#[command(name = "site-mcp", version, about)]
struct Cli {
    /// Port to bind; overrides SERVER_PORT.
    #[arg(long)]
    port: Option<u16>,
    /// Print the access token and exit.
    #[arg(long)]
    print_token: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load().context("failed to load configuration")?;
    logging::init_tracing(true);
    if let Some(port) = cli.port {
        config.server_port = Some(port);
    }

    let credentials =
        Arc::new(CredentialStore::load(&config).context("failed to load access token")?);
    if cli.print_token {
        println!("{}", credentials.snapshot().access.token());
        return Ok(());
    }

    let dispatcher = Arc::new(
        Dispatcher::from_config(&config, credentials.clone())
            .context("failed to build search client")?,
    );
    let app = api::create_router(
        AppState {
            dispatcher,
            credentials,
        },
        &config.namespace,
    );

    let (listener, port) = bind_listener(config.server_port)
        .await
        .context("failed to bind listener")?;
    tracing::info!(
        "Listening on http://0.0.0.0:{}{}",
        port,
        api::mcp_path(&config.namespace)
    );
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn bind_listener(server_port: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = server_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 4100..=4199;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 4100-4199",
    ))
}
