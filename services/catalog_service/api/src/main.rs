//! Catalog Service
//!
//! Entry point: parses the CLI, loads configuration, opens the database
//! pool, and serves the HTTP API (spec §6).

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_service_api::create_router;
use shared_config::Config;
use shared_db::init_pool;

#[derive(Parser)]
#[command(name = "catalog-service", about = "Catalog ingestion and analytics service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default).
    Server {
        /// Bind host; defaults to the environment-sourced config value.
        #[arg(long)]
        host: Option<String>,
        /// Bind port; defaults to the environment-sourced config value.
        #[arg(long)]
        port: Option<u16>,
        /// Raise the tracing filter to `trace`.
        #[arg(long)]
        debug: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    let debug = match &cli.command {
        Some(Commands::Server { host, port, debug }) => {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
            *debug || config.debug
        },
        None => config.debug,
    };

    init_tracing(debug);

    let pool = init_pool(&config.database_url, config.max_connections)
        .await
        .context("failed to initialize database pool")?;

    let app = create_router(pool);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse().context("invalid host/port")?;
    let listener = tokio::net::TcpListener::bind(addr).await.context("failed to bind to address")?;

    tracing::info!(%addr, "catalog service listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "trace" } else { "catalog_service=debug,tower_http=debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer()).init();
}
