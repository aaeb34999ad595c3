//! Error types for the upstream video client.

use agrolink_core::error::AgroError;

#[derive(Debug, thiserror::Error)]
pub enum YoutubeError {
    #[error("no YouTube API key configured")]
    MissingApiKey,
    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: &'static str, status: u16 },
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for YoutubeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            YoutubeError::Timeout(err.to_string())
        } else if err.is_decode() {
            YoutubeError::Decode(err.to_string())
        } else {
            YoutubeError::Network(err.to_string())
        }
    }
}

impl From<YoutubeError> for AgroError {
    fn from(err: YoutubeError) -> Self {
        AgroError::Upstream(err.to_string())
    }
}
