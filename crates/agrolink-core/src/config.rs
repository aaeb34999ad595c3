use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AgroError, Result};

/// Top-level configuration for the AgroLink service.
///
/// Loaded from `~/.agrolink/config.toml` by default. Each section corresponds
/// to one simulated subsystem or to the upstream video proxy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgroConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub youtube: YoutubeConfig,
}

impl AgroConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AgroConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let a = &self.assistant;
        if a.thinking_delay_min_ms > a.thinking_delay_max_ms {
            return Err(AgroError::Config(format!(
                "assistant.thinking_delay_min_ms ({}) exceeds thinking_delay_max_ms ({})",
                a.thinking_delay_min_ms, a.thinking_delay_max_ms
            )));
        }
        if a.max_message_length == 0 {
            return Err(AgroError::Config(
                "assistant.max_message_length must be positive".to_string(),
            ));
        }

        let u = &self.upload;
        if u.min_increment == 0 || u.min_increment > u.max_increment || u.max_increment > 100 {
            return Err(AgroError::Config(format!(
                "upload increments must satisfy 1 <= min ({}) <= max ({}) <= 100",
                u.min_increment, u.max_increment
            )));
        }
        if u.tick_interval_ms == 0 {
            return Err(AgroError::Config(
                "upload.tick_interval_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&u.failure_rate) {
            return Err(AgroError::Config(format!(
                "upload.failure_rate must be within 0.0..=1.0, got {}",
                u.failure_rate
            )));
        }

        if u.max_retained_jobs == 0 {
            return Err(AgroError::Config(
                "upload.max_retained_jobs must be positive".to_string(),
            ));
        }

        let v = &self.voice;
        if v.min_confidence > v.max_confidence || v.max_confidence > 100 {
            return Err(AgroError::Config(format!(
                "voice confidence must satisfy min ({}) <= max ({}) <= 100",
                v.min_confidence, v.max_confidence
            )));
        }
        if v.transcript.trim().is_empty() {
            return Err(AgroError::Config(
                "voice.transcript must not be empty".to_string(),
            ));
        }

        let y = &self.youtube;
        if !(1..=50).contains(&y.default_max_results) {
            return Err(AgroError::Config(format!(
                "youtube.default_max_results must be within 1..=50, got {}",
                y.default_max_results
            )));
        }
        if y.query_terms.is_empty() {
            return Err(AgroError::Config(
                "youtube.query_terms must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// HTTP port to listen on.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

/// Chat assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Lower bound of the artificial "thinking" delay.
    pub thinking_delay_min_ms: u64,
    /// Upper bound of the artificial "thinking" delay.
    pub thinking_delay_max_ms: u64,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            thinking_delay_min_ms: 1000,
            thinking_delay_max_ms: 3000,
            max_message_length: 2000,
        }
    }
}

/// Upload simulator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Milliseconds between progress ticks.
    pub tick_interval_ms: u64,
    /// Smallest progress increment per tick (percent).
    pub min_increment: u8,
    /// Largest progress increment per tick (percent).
    pub max_increment: u8,
    /// Fixed time spent in the processing phase.
    pub processing_delay_ms: u64,
    /// Probability (0.0 to 1.0) that a job ends in the error state.
    pub failure_rate: f64,
    /// Upper bound on remembered jobs; the oldest finished ones are dropped.
    pub max_retained_jobs: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            min_increment: 5,
            max_increment: 20,
            processing_delay_ms: 5000,
            failure_rate: 0.0,
            max_retained_jobs: 100,
        }
    }
}

/// Voice assistant simulator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Time spent "listening".
    pub listening_ms: u64,
    /// Time spent "recognizing".
    pub processing_ms: u64,
    /// Time spent "speaking" the reply.
    pub speaking_ms: u64,
    /// The scripted utterance every session recognizes.
    pub transcript: String,
    /// Lowest reported recognition confidence (percent).
    pub min_confidence: u8,
    /// Highest reported recognition confidence (percent).
    pub max_confidence: u8,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            listening_ms: 3000,
            processing_ms: 2000,
            speaking_ms: 4000,
            transcript: "How can I improve water efficiency in my irrigation system?"
                .to_string(),
            min_confidence: 80,
            max_confidence: 99,
        }
    }
}

/// Trending video proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// Base URL of the video data API.
    pub api_base_url: String,
    /// API key. Falls back to the `YOUTUBE_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Results returned when the caller does not pass `maxResults`.
    pub default_max_results: u32,
    /// Per-request timeout for upstream calls.
    pub request_timeout_secs: u64,
    /// Search terms; one is picked at random per request.
    pub query_terms: Vec<String>,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            default_max_results: 12,
            request_timeout_secs: 10,
            query_terms: [
                "agriculture technology",
                "smart farming",
                "precision agriculture",
                "sustainable farming",
                "agtech innovation",
                "vertical farming",
                "farm automation",
                "drone farming",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}
