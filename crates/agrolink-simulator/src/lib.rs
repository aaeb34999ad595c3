//! AgroLink simulators - timer-driven stand-ins for video upload and voice
//! recognition.
//!
//! Uploads move through Uploading -> Processing -> Completed; the voice
//! assistant cycles Idle -> Listening -> Processing -> Speaking -> Idle.
//! State lives behind `Arc<Mutex<>>` and is advanced by tokio tasks that the
//! simulators abort on shutdown.

pub mod error;
pub mod state;
pub mod upload;
pub mod voice;

pub use error::SimulatorError;
pub use state::{UploadStatus, VoicePhase};
pub use upload::{IncrementFn, UploadJob, UploadRequest, UploadSimulator, Visibility};
pub use voice::{ConfidenceFn, VoiceSession, VoiceSimulator};
