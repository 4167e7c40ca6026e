//! Repository statistics proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser (CORS)                    repo-stats-proxy                        Upstream
//!  ────────────────▶ cors ─▶ handlers ─┬─ contributors (REST, paginated) ─▶ /repos/{o}/{r}/contributors
//!  ◀──────────────── cors ◀────────────┴─ stats (GraphQL, viewer→user)   ─▶ /graphql
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use repo_stats_proxy::config::{load_config, ServiceConfig};
use repo_stats_proxy::observability::{logging, metrics};
use repo_stats_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "repo-stats-proxy", version)]
#[command(about = "Proxy for repository contributor and profile statistics", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("repo-stats-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_base_url = %config.upstream.api_base_url,
        graphql_url = %config.upstream.graphql_url,
        max_pages = ?config.contributors.max_pages,
        allow_user_selection = config.stats.allow_user_selection,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
