//! AgroLink application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Build the assistant, simulators, community feed and video client
//! 3. Serve the axum REST API until Ctrl-C, then stop the simulators

mod cli;

use clap::Parser;

use agrolink_api::routes;
use agrolink_api::state::AppState;
use agrolink_core::config::AgroConfig;

use cli::CliArgs;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Read the config file before logging starts, but report on it after.
    let config_file = args.resolve_config_path();
    let loaded = cli::load_config_file(&config_file);

    // Tracing. RUST_LOG wins, then --log-level, then the file, then "info".
    let log_level = args.log_level.clone().unwrap_or_else(|| match &loaded {
        Ok(Some(config)) => config.general.log_level.clone(),
        _ => "info".to_string(),
    });
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting AgroLink v{}", env!("CARGO_PKG_VERSION"));

    let file_config = match loaded {
        Ok(Some(config)) => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
            config
        }
        Ok(None) => {
            tracing::info!(path = %config_file.display(), "No config file, using defaults");
            AgroConfig::default()
        }
        Err(e) => {
            tracing::error!(path = %config_file.display(), error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    let config = args.apply(file_config);
    config.validate()?;
    if config.youtube.api_key.is_none() {
        tracing::warn!("No YouTube API key configured; /api/youtube/trending will return 500");
    }

    let state = AppState::new(config.clone())?;

    if let Err(e) = routes::start_server(&config, state.clone(), shutdown_signal()).await {
        tracing::error!(port = config.general.port, error = %e, "API server failed");
        state.shutdown();
        return Err(e.into());
    }

    state.shutdown();
    tracing::info!("AgroLink stopped");
    Ok(())
}
