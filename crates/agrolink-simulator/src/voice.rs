//! Simulated voice assistant.
//!
//! A session walks Idle -> Listening -> Processing -> Speaking -> Idle on
//! fixed timers. Recognition always yields the configured transcript with a
//! random confidence, and the reply comes from the same keyword responder
//! the chat uses.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use agrolink_assistant::responder::{IntentResponder, Topic};
use agrolink_core::config::VoiceConfig;

use crate::error::SimulatorError;
use crate::state::VoicePhase;

/// Client-visible voice assistant state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceSession {
    pub phase: VoicePhase,
    pub is_listening: bool,
    pub is_processing: bool,
    pub is_speaking: bool,
    /// Recognition confidence in percent, set once processing starts.
    pub confidence: Option<u8>,
    pub last_command: Option<String>,
    pub last_response: Option<String>,
    pub last_topic: Option<Topic>,
    pub started_at: Option<DateTime<Utc>>,
}

impl VoiceSession {
    /// Move to `target`, keeping the boolean flags in step with the phase.
    pub fn transition(&mut self, target: VoicePhase) -> Result<(), SimulatorError> {
        if !self.phase.can_transition_to(&target) {
            return Err(SimulatorError::InvalidTransition {
                from: self.phase.to_string(),
                to: target.to_string(),
            });
        }
        tracing::debug!("Voice state: {} -> {}", self.phase, target);
        self.phase = target;
        self.is_listening = target == VoicePhase::Listening;
        self.is_processing = target == VoicePhase::Processing;
        self.is_speaking = target == VoicePhase::Speaking;
        Ok(())
    }
}

/// Source of recognition confidence values.
pub type ConfidenceFn = Arc<dyn Fn() -> u8 + Send + Sync>;

/// Owns the single voice session and the task that drives it.
pub struct VoiceSimulator {
    session: Arc<Mutex<VoiceSession>>,
    task: Mutex<Option<JoinHandle<()>>>,
    config: VoiceConfig,
    confidence: ConfidenceFn,
}

impl std::fmt::Debug for VoiceSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSimulator")
            .field("session", &self.session)
            .field("config", &self.config)
            .finish()
    }
}

impl VoiceSimulator {
    /// Create a simulator drawing confidence uniformly from the configured range.
    pub fn new(config: VoiceConfig) -> Self {
        let min = config.min_confidence.min(100);
        let max = config.max_confidence.clamp(min, 100);
        let confidence: ConfidenceFn = Arc::new(move || rand::rng().random_range(min..=max));
        Self::with_confidence(config, confidence)
    }

    /// Create a simulator with a custom confidence source.
    pub fn with_confidence(config: VoiceConfig, confidence: ConfidenceFn) -> Self {
        Self {
            session: Arc::new(Mutex::new(VoiceSession::default())),
            task: Mutex::new(None),
            config,
            confidence,
        }
    }

    /// Begin a listening cycle.
    ///
    /// Fails with `Busy` unless the session is idle. Must be called from
    /// within a tokio runtime.
    pub fn start(&self) -> Result<VoiceSession, SimulatorError> {
        let snapshot = {
            let mut session = lock_session(&self.session)?;
            if session.phase != VoicePhase::Idle {
                return Err(SimulatorError::Busy(session.phase.to_string()));
            }
            session.transition(VoicePhase::Listening)?;
            session.started_at = Some(Utc::now());
            session.confidence = None;
            session.clone()
        };

        tracing::info!("Voice session started");

        let handle = tokio::spawn(drive_voice(
            Arc::clone(&self.session),
            self.config.clone(),
            Arc::clone(&self.confidence),
        ));
        let mut task = self
            .task
            .lock()
            .map_err(|e| SimulatorError::State(format!("voice task lock poisoned: {}", e)))?;
        *task = Some(handle);

        Ok(snapshot)
    }

    /// Snapshot of the session.
    pub fn status(&self) -> Result<VoiceSession, SimulatorError> {
        Ok(lock_session(&self.session)?.clone())
    }

    /// Abort a running cycle, if any.
    pub fn shutdown(&self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for VoiceSimulator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock_session(
    session: &Mutex<VoiceSession>,
) -> Result<std::sync::MutexGuard<'_, VoiceSession>, SimulatorError> {
    session
        .lock()
        .map_err(|e| SimulatorError::State(format!("voice session lock poisoned: {}", e)))
}

async fn drive_voice(
    session: Arc<Mutex<VoiceSession>>,
    config: VoiceConfig,
    confidence: ConfidenceFn,
) {
    if let Err(e) = run_voice(&session, &config, &confidence).await {
        tracing::warn!(error = %e, "Voice simulation aborted");
        if let Ok(mut s) = session.lock() {
            *s = VoiceSession::default();
        }
    }
}

async fn run_voice(
    session: &Mutex<VoiceSession>,
    config: &VoiceConfig,
    confidence: &ConfidenceFn,
) -> Result<(), SimulatorError> {
    tokio::time::sleep(Duration::from_millis(config.listening_ms)).await;

    let score = confidence();
    {
        let mut s = lock_session(session)?;
        s.transition(VoicePhase::Processing)?;
        s.confidence = Some(score);
        s.last_command = Some(config.transcript.clone());
    }
    tracing::debug!(confidence = score, "Voice command recognized");

    tokio::time::sleep(Duration::from_millis(config.processing_ms)).await;

    let reply = IntentResponder::new().respond(&config.transcript);
    {
        let mut s = lock_session(session)?;
        s.transition(VoicePhase::Speaking)?;
        s.last_response = Some(reply.text.to_string());
        s.last_topic = Some(reply.topic);
    }
    tracing::debug!(topic = ?reply.topic, "Voice assistant speaking");

    tokio::time::sleep(Duration::from_millis(config.speaking_ms)).await;

    lock_session(session)?.transition(VoicePhase::Idle)?;
    tracing::info!("Voice session finished");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
