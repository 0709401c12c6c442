//! DevPilot Engine - JSON-lines console for the task tracking core
//!
//! Reads one request per line on stdin and writes one reply per line on
//! stdout. Logs go to stderr.

use anyhow::Context;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devpilot_engine::infrastructure::config::AppConfig;
use devpilot_engine::infrastructure::console;
use devpilot_engine::infrastructure::seed::seed_demo_data;
use devpilot_engine::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devpilot_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting DevPilot Engine");

    // Load configuration
    let config = AppConfig::from_env().context("Invalid configuration")?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Seed demo data: {}", config.seed_demo_data);
    tracing::info!("  Request timeout: {:?}", config.request_timeout);

    // Initialize application state
    let (state, mut events) = AppState::new(config);
    tracing::info!("Application state initialized");

    seed_demo_data(&state.mediator, &state.config)
        .await
        .context("Failed to seed demo data")?;

    let console = console::run(
        &state.mediator,
        &mut events,
        state.config.request_timeout,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );

    // Serve until stdin closes or Ctrl+C
    tokio::select! {
        result = console => {
            result?;
            tracing::info!("Input closed, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
