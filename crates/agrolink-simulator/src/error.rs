//! Error types for the upload and voice simulators.

use agrolink_core::error::AgroError;
use uuid::Uuid;

/// Errors from the simulated pipelines.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("upload not found: {0}")]
    UploadNotFound(Uuid),
    #[error("invalid upload request: {0}")]
    InvalidRequest(String),
    #[error("voice assistant is busy ({0})")]
    Busy(String),
    #[error("simulator state error: {0}")]
    State(String),
}

impl From<SimulatorError> for AgroError {
    fn from(err: SimulatorError) -> Self {
        AgroError::Simulation(err.to_string())
    }
}
