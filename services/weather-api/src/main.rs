//! Weather API Server
//!
//! Aggregates KMA, AirKorea, Nominatim and sun data for one coordinate.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use weather_api::config::{self, AppConfig};
use weather_api::state::AppState;

/// Weather API Server
#[derive(Parser, Debug)]
#[command(name = "weather-api")]
#[command(about = "Weather, air quality and sun data for a coordinate in South Korea")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8089", env = "WEATHER_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Configuration file
    #[arg(short, long, default_value = "config/weather-api.yaml", env = "WEATHER_CONFIG")]
    config: PathBuf,

    /// Number of worker threads
    #[arg(long, env = "WEATHER_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .expect("Failed to create Tokio runtime");

    runtime.block_on(async move {
        if let Err(e) = run_server(args).await {
            tracing::error!("Server failed: {:#}", e);
            std::process::exit(1);
        }
    });
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting weather API server");

    let prometheus = weather_api::metrics::install_recorder()?;
    let app_config = AppConfig::load(&args.config)?;
    let state = Arc::new(AppState::from_config(
        &app_config,
        config::service_key_from_env(),
        Some(prometheus),
    )?);

    let app = weather_api::app(state);

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Weather API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("Server failed")?;
    Ok(())
}
