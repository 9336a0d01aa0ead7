//! Concurrent fetch-and-merge service entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use concurrent_api::aggregate::DataAggregator;
use concurrent_api::api::{create_router, AppState};
use concurrent_api::config::Config;
use concurrent_api::metrics;
use concurrent_api::utils::shutdown_signal;
use concurrent_api::{Result, ServiceError};

/// Fetch two upstream JSON APIs concurrently and serve the merged result.
#[derive(Parser, Debug)]
#[command(name = "concurrent-api")]
#[command(about = "Serve GET /api/fetch-data, merging two upstream APIs fetched in parallel")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port, overriding PORT.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch and merge once, printing the result.
    Fetch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration; logging falls back to defaults if it fails
    let config = load_config();

    // Initialize logging
    let directives = match &config {
        Ok(config) => config.log_directives(args.verbose),
        Err(_) => Config::default().log_directives(args.verbose),
    };
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    metrics::init_metrics();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Fetch) => Ok(cmd_fetch(config?).await?),
        Some(Command::Serve { port }) => Ok(cmd_serve(config?, port).await?),
        None => Ok(cmd_serve(config?, None).await?),
    }
}

/// Load and validate configuration.
fn load_config() -> Result<Config> {
    let config = Config::load()?;
    config.validate().map_err(ServiceError::InvalidConfig)?;
    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config(config: Result<Config>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CONCURRENT API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match config {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration check failed"));
        }
    };

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  API 1 URL: {}", config.api1_url);
    println!("  API 2 URL: {}", config.api2_url);
    println!("  Upstream Timeout: {} ms", config.upstream_timeout_ms);
    println!("  Pool Size: {}", config.http_pool_size);
    println!("  Port: {}", config.port);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled {
            format!("Enabled (port {})", config.metrics_port)
        } else {
            "Disabled".to_string()
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch and merge once, printing the merged JSON.
async fn cmd_fetch(config: Config) -> Result<()> {
    let aggregator = DataAggregator::new(&config)?;

    let merged = aggregator.fetch_data().await?;

    println!("{}", serde_json::to_string_pretty(&merged)?);

    if merged.is_error() {
        return Err(ServiceError::UpstreamsUnavailable);
    }

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(mut config: Config, port_override: Option<u16>) -> Result<()> {
    if let Some(port) = port_override {
        config.port = port;
    }

    info!(
        api1_url = %config.api1_url,
        api2_url = %config.api2_url,
        timeout_ms = config.upstream_timeout_ms,
        "Configuration loaded"
    );

    if config.metrics_enabled {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        if let Err(e) = metrics::install_exporter(metrics_addr) {
            error!(error = %e, "Failed to install Prometheus exporter");
        }
    }

    let aggregator = DataAggregator::new(&config)?;
    let router = create_router(AppState::new(aggregator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
