use thiserror::Error;

/// Top-level error type for AgroLink.
///
/// Subsystem crates define their own error types and implement
/// `From<AgroError>` where they need to absorb core failures (configuration,
/// serialization, I/O).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AgroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AgroError {
    fn from(err: toml::de::Error) -> Self {
        AgroError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AgroError {
    fn from(err: toml::ser::Error) -> Self {
        AgroError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AgroError {
    fn from(err: serde_json::Error) -> Self {
        AgroError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for AgroLink operations.
pub type Result<T> = std::result::Result<T, AgroError>;
