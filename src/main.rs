use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xchange_api::config::{self, StoreBackend};
use xchange_api::state::AppState;
use xchange_api::{app, database};

#[derive(Parser, Debug)]
#[command(name = "xchange-api")]
#[command(about = "REST backend for the Xchange marketplace")]
#[command(version)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Store backend: postgres or memory (overrides STORE_BACKEND)
    #[arg(long)]
    store: Option<StoreBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xchange_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = config::config().clone();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(store) = cli.store {
        config.database.backend = store;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!("Starting Xchange API in {:?} mode", config.environment);

    let stores = database::connect(&config.database)
        .await
        .context("failed to connect to the store")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid listen address")?;
    let state = AppState::new(config, stores);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
