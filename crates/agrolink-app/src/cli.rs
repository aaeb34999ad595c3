//! CLI argument definitions for the AgroLink server.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

use agrolink_core::config::AgroConfig;
use agrolink_core::error::AgroError;

/// AgroLink: farming assistant, upload and voice demos, and an agriculture
/// video proxy behind one local HTTP server.
#[derive(Parser, Debug, Default)]
#[command(name = "agrolink", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// YouTube Data API key for the trending proxy.
    #[arg(long = "youtube-api-key")]
    pub youtube_api_key: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > AGROLINK_CONFIG env var > ~/.agrolink/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("AGROLINK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > AGROLINK_PORT env var > config file value > 3000.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        pick_port(
            self.port,
            std::env::var("AGROLINK_PORT").ok().as_deref(),
            config_port,
        )
    }

    /// Resolve the YouTube API key.
    ///
    /// Priority: --youtube-api-key flag > YOUTUBE_API_KEY env var > config file value.
    pub fn resolve_api_key(&self, config_key: Option<String>) -> Option<String> {
        self.youtube_api_key
            .clone()
            .or_else(|| std::env::var("YOUTUBE_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .or(config_key)
    }

    /// Fold every override into the loaded config.
    pub fn apply(&self, mut config: AgroConfig) -> AgroConfig {
        config.general.port = self.resolve_port(config.general.port);
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        config.youtube.api_key = self.resolve_api_key(config.youtube.api_key.take());
        config
    }
}

/// Read the config file if it exists.
///
/// A missing file is `Ok(None)`; a file that fails to parse or validate is
/// an error rather than a silent fall back to defaults.
pub fn load_config_file(path: &Path) -> Result<Option<AgroConfig>, AgroError> {
    if !path.exists() {
        return Ok(None);
    }
    AgroConfig::load(path).map(Some)
}

fn pick_port(flag: Option<u16>, env: Option<&str>, config_port: u16) -> u16 {
    if let Some(p) = flag {
        return p;
    }
    if let Some(p) = env.and_then(|v| v.trim().parse::<u16>().ok()) {
        return p;
    }
    if config_port != 0 {
        return config_port;
    }
    3000
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".agrolink").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".agrolink").join("config.toml");
    }
    PathBuf::from("config.toml")
}
