//! docgate - authenticated document service

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod seed;

use config::{Config, LoggingConfig, Secrets};
use docgate_api::{AppState, create_router};
use docgate_auth::{ApiKeyGate, TokenCodec};
use docgate_db::Database;

/// docgate - document store with API-key and token authentication
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "DOCGATE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "DOCGATE_PORT")]
    port: Option<u16>,

    /// Database connection string
    #[arg(long, env = "DOCGATE_DATABASE_URL")]
    database_url: Option<String>,

    /// Shared key for the public endpoint
    #[arg(long, env = "DOCGATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Token signing secret
    #[arg(long, env = "DOCGATE_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;

    init_logging(&config.logging);

    info!("Starting docgate v{}", env!("CARGO_PKG_VERSION"));

    let secrets = Secrets::resolve(args.api_key, args.jwt_secret)?;

    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if let Some(dir) = config.database.data_dir() {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create data directory {:?}", dir))?;
    }

    let db = Database::new(&config.database.url)
        .await
        .context("Failed to open database")?;

    if config.seed.enabled {
        seed::seed_defaults(&db).await?;
    }

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    let tokens = Arc::new(TokenCodec::for_login(&secrets.jwt_secret));
    let api_keys = Arc::new(ApiKeyGate::new(secrets.api_key));

    let state = AppState::new(db, tokens, api_keys);

    let app = create_router(state, Some(Arc::new(metrics_handle))).layer(TraceLayer::new_for_http());

    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
