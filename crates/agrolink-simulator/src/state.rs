//! State tables for the simulated upload and voice pipelines.
//!
//! Upload jobs:
//! - Uploading -> Processing (progress reached 100)
//! - Processing -> Completed (processing delay elapsed)
//! - Uploading -> Error, Processing -> Error (injected failure)
//!
//! Voice sessions:
//! - Idle -> Listening -> Processing -> Speaking -> Idle

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a simulated upload job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Progress is climbing towards 100.
    Uploading,
    /// Transfer "finished"; waiting out the fixed processing delay.
    Processing,
    /// Terminal success state.
    Completed,
    /// Terminal failure state. Only reachable through failure injection.
    Error,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Processing => write!(f, "processing"),
            UploadStatus::Completed => write!(f, "completed"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

impl UploadStatus {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &UploadStatus) -> bool {
        matches!(
            (self, target),
            (UploadStatus::Uploading, UploadStatus::Processing)
                | (UploadStatus::Processing, UploadStatus::Completed)
                | (UploadStatus::Uploading, UploadStatus::Error)
                | (UploadStatus::Processing, UploadStatus::Error)
        )
    }

    /// Whether the job has stopped changing.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error)
    }
}

/// Phase of the simulated voice assistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoicePhase {
    /// Ready to start.
    #[default]
    Idle,
    /// "Recording" the user.
    Listening,
    /// "Recognizing" the scripted transcript.
    Processing,
    /// "Reading out" the reply.
    Speaking,
}

impl fmt::Display for VoicePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoicePhase::Idle => write!(f, "idle"),
            VoicePhase::Listening => write!(f, "listening"),
            VoicePhase::Processing => write!(f, "processing"),
            VoicePhase::Speaking => write!(f, "speaking"),
        }
    }
}

impl VoicePhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &VoicePhase) -> bool {
        matches!(
            (self, target),
            (VoicePhase::Idle, VoicePhase::Listening)
                | (VoicePhase::Listening, VoicePhase::Processing)
                | (VoicePhase::Processing, VoicePhase::Speaking)
                | (VoicePhase::Speaking, VoicePhase::Idle)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
