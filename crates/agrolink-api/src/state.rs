//! Application state shared across all route handlers.
//!
//! AppState holds every simulated subsystem and is passed to handlers via
//! axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use agrolink_assistant::Conversation;
use agrolink_community::CommunityFeed;
use agrolink_core::config::AgroConfig;
use agrolink_core::error::AgroError;
use agrolink_simulator::{UploadSimulator, VoiceSimulator};
use agrolink_youtube::{TrendingSource, YoutubeClient};

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. Each
/// subsystem guards its own mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AgroConfig>,
    /// Chat transcript with the farming assistant.
    pub conversation: Arc<Conversation>,
    /// Simulated video uploads.
    pub uploads: Arc<UploadSimulator>,
    /// Simulated voice assistant.
    pub voice: Arc<VoiceSimulator>,
    /// Community feed.
    pub feed: Arc<CommunityFeed>,
    /// Upstream trending video source.
    pub trending: Arc<dyn TrendingSource>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Build every subsystem from configuration.
    pub fn new(config: AgroConfig) -> Result<Self, AgroError> {
        let trending: Arc<dyn TrendingSource> = Arc::new(YoutubeClient::new(&config.youtube)?);
        Ok(Self {
            conversation: Arc::new(Conversation::new(config.assistant.clone())),
            uploads: Arc::new(UploadSimulator::new(config.upload.clone())),
            voice: Arc::new(VoiceSimulator::new(config.voice.clone())),
            feed: Arc::new(CommunityFeed::seeded()),
            trending,
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }

    /// Replace the trending video source (used by tests and alternative backends).
    pub fn with_trending_source(mut self, source: Arc<dyn TrendingSource>) -> Self {
        self.trending = source;
        self
    }

    /// Replace the upload simulator.
    pub fn with_uploads(mut self, uploads: UploadSimulator) -> Self {
        self.uploads = Arc::new(uploads);
        self
    }

    /// Stop all simulation tasks.
    pub fn shutdown(&self) {
        self.uploads.shutdown();
        self.voice.shutdown();
    }
}
