//! Simulated video upload pipeline.
//!
//! Each job is driven by its own tokio task: progress climbs in random
//! increments on a fixed tick until it reaches exactly 100, the job moves to
//! processing for a fixed delay, then completes. Nothing is transferred or
//! stored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use uuid::Uuid;

use agrolink_core::config::UploadConfig;

use crate::error::SimulatorError;
use crate::state::UploadStatus;

/// Maximum number of tags accepted on an upload.
const MAX_TAGS: usize = 20;

/// Who can see an uploaded video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Unlisted,
}

/// What the client sends when a file is selected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub file_name: String,
    #[serde(default)]
    pub file_size_bytes: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl UploadRequest {
    /// Validate and normalize the request.
    ///
    /// Title and file name are trimmed and must be non-empty. Tags are
    /// trimmed, blanks dropped, and duplicates removed keeping first-seen order.
    pub fn normalize(mut self) -> Result<Self, SimulatorError> {
        self.title = self.title.trim().to_string();
        self.file_name = self.file_name.trim().to_string();
        if self.title.is_empty() {
            return Err(SimulatorError::InvalidRequest("title is required".to_string()));
        }
        if self.file_name.is_empty() {
            return Err(SimulatorError::InvalidRequest(
                "file_name is required".to_string(),
            ));
        }

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags.iter().map(|t| t.trim()) {
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        if tags.len() > MAX_TAGS {
            return Err(SimulatorError::InvalidRequest(format!(
                "at most {} tags are allowed, got {}",
                MAX_TAGS,
                tags.len()
            )));
        }
        self.tags = tags;
        Ok(self)
    }
}

/// A simulated upload, mutated in place by its driver task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadJob {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub status: UploadStatus,
    /// Percent complete, 0 to 100.
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl UploadJob {
    /// Create a job in the uploading state at 0%.
    pub fn new(request: UploadRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            file_name: request.file_name,
            file_size_bytes: request.file_size_bytes,
            tags: request.tags,
            visibility: request.visibility,
            status: UploadStatus::Uploading,
            progress: 0,
            created_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }

    /// Add `increment` percent, clamped at 100. Returns the new progress.
    ///
    /// Only valid while uploading; progress never decreases.
    pub fn advance(&mut self, increment: u8) -> Result<u8, SimulatorError> {
        if self.status != UploadStatus::Uploading {
            return Err(SimulatorError::State(format!(
                "cannot advance progress while {}",
                self.status
            )));
        }
        self.progress = self.progress.saturating_add(increment).min(100);
        Ok(self.progress)
    }

    /// Move to `target`, enforcing the transition table.
    ///
    /// Leaving the uploading state for processing additionally requires
    /// progress to be exactly 100.
    pub fn transition(&mut self, target: UploadStatus) -> Result<(), SimulatorError> {
        if !self.status.can_transition_to(&target) {
            return Err(SimulatorError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        if target == UploadStatus::Processing && self.progress != 100 {
            return Err(SimulatorError::State(format!(
                "cannot start processing at {}%",
                self.progress
            )));
        }
        tracing::debug!(job_id = %self.id, "Upload state: {} -> {}", self.status, target);
        self.status = target;
        if target.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Move to the error state with a reason.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), SimulatorError> {
        self.transition(UploadStatus::Error)?;
        self.error = Some(reason.into());
        Ok(())
    }
}

/// Source of per-tick progress increments.
pub type IncrementFn = Arc<dyn Fn() -> u8 + Send + Sync>;

type JobMap = Arc<Mutex<HashMap<Uuid, UploadJob>>>;

/// Owns all upload jobs and the tasks that drive them.
///
/// Driver tasks are aborted on `shutdown` or when the simulator is dropped.
pub struct UploadSimulator {
    jobs: JobMap,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    config: UploadConfig,
    increments: IncrementFn,
}

impl std::fmt::Debug for UploadSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadSimulator")
            .field("jobs", &self.jobs)
            .field("config", &self.config)
            .finish()
    }
}

impl UploadSimulator {
    /// Create a simulator drawing increments uniformly from the configured range.
    pub fn new(config: UploadConfig) -> Self {
        let min = config.min_increment.max(1);
        let max = config.max_increment.max(min);
        let increments: IncrementFn = Arc::new(move || rand::rng().random_range(min..=max));
        Self::with_increments(config, increments)
    }

    /// Create a simulator with a custom increment source.
    pub fn with_increments(config: UploadConfig, increments: IncrementFn) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            tasks: Mutex::new(Vec::new()),
            config,
            increments,
        }
    }

    /// Validate the request, register a new job, and start driving it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_upload(&self, request: UploadRequest) -> Result<UploadJob, SimulatorError> {
        let job = UploadJob::new(request.normalize()?);
        let id = job.id;
        {
            let mut jobs = lock_jobs(&self.jobs)?;
            prune_finished(&mut jobs, self.config.max_retained_jobs);
            jobs.insert(id, job.clone());
        }

        tracing::info!(
            job_id = %id,
            title = %job.title,
            visibility = ?job.visibility,
            "Upload started"
        );

        let handle = tokio::spawn(drive_upload(
            Arc::clone(&self.jobs),
            id,
            self.config.clone(),
            Arc::clone(&self.increments),
        ));

        let mut tasks = self
            .tasks
            .lock()
            .map_err(|e| SimulatorError::State(format!("task list lock poisoned: {}", e)))?;
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);

        Ok(job)
    }

    /// Snapshot of one job.
    pub fn get(&self, id: Uuid) -> Result<UploadJob, SimulatorError> {
        lock_jobs(&self.jobs)?
            .get(&id)
            .cloned()
            .ok_or(SimulatorError::UploadNotFound(id))
    }

    /// Snapshot of all jobs, newest first.
    pub fn list(&self) -> Result<Vec<UploadJob>, SimulatorError> {
        let mut jobs: Vec<UploadJob> = lock_jobs(&self.jobs)?.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    /// Number of driver tasks still running.
    pub fn active_tasks(&self) -> usize {
        self.tasks
            .lock()
            .map(|t| t.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    /// Abort every outstanding driver task. Jobs keep their last state.
    pub fn shutdown(&self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            let count = tasks.len();
            for task in tasks.drain(..) {
                task.abort();
            }
            tracing::info!(count, "Upload simulator shut down");
        }
    }
}

impl Drop for UploadSimulator {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
    }
}

fn lock_jobs(
    jobs: &JobMap,
) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, UploadJob>>, SimulatorError> {
    jobs.lock()
        .map_err(|e| SimulatorError::State(format!("job map lock poisoned: {}", e)))
}

/// Drop the oldest finished jobs so at most `keep - 1` remain, leaving room
/// for the job about to be inserted. Jobs still uploading or processing are
/// never dropped.
fn prune_finished(jobs: &mut HashMap<Uuid, UploadJob>, keep: usize) {
    if jobs.len() < keep {
        return;
    }
    let mut finished: Vec<(DateTime<Utc>, Uuid)> = jobs
        .values()
        .filter(|job| job.status.is_terminal())
        .map(|job| (job.created_at, job.id))
        .collect();
    finished.sort();

    let excess = jobs.len() + 1 - keep.max(1);
    for (_, id) in finished.into_iter().take(excess) {
        jobs.remove(&id);
    }
    tracing::debug!(retained = jobs.len(), "Pruned finished uploads");
}

/// Apply `f` to job `id` under the lock.
fn with_job<T>(
    jobs: &JobMap,
    id: Uuid,
    f: impl FnOnce(&mut UploadJob) -> Result<T, SimulatorError>,
) -> Result<T, SimulatorError> {
    let mut guard = lock_jobs(jobs)?;
    let job = guard
        .get_mut(&id)
        .ok_or(SimulatorError::UploadNotFound(id))?;
    f(job)
}

/// Driver task for one job.
async fn drive_upload(jobs: JobMap, id: Uuid, config: UploadConfig, increments: IncrementFn) {
    if let Err(e) = run_upload(&jobs, id, &config, &increments).await {
        tracing::warn!(job_id = %id, error = %e, "Upload simulation aborted");
        if let Err(mark_err) = with_job(&jobs, id, |job| job.fail(e.to_string())) {
            tracing::warn!(job_id = %id, error = %mark_err, "Failed to mark upload as errored");
        }
    }
}

async fn run_upload(
    jobs: &JobMap,
    id: Uuid,
    config: &UploadConfig,
    increments: &IncrementFn,
) -> Result<(), SimulatorError> {
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms.max(1)));
    // First tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let increment = increments();
        let progress = with_job(jobs, id, |job| {
            let progress = job.advance(increment)?;
            if progress == 100 {
                job.transition(UploadStatus::Processing)?;
            }
            Ok(progress)
        })?;
        tracing::trace!(job_id = %id, progress, "Upload progress");
        if progress == 100 {
            break;
        }
    }

    tracing::debug!(job_id = %id, "Upload transferred, processing");
    tokio::time::sleep(Duration::from_millis(config.processing_delay_ms)).await;

    let rate = if (0.0..=1.0).contains(&config.failure_rate) {
        config.failure_rate
    } else {
        0.0
    };
    let failed = rand::rng().random_bool(rate);

    with_job(jobs, id, |job| {
        if failed {
            job.fail("Video processing failed")
        } else {
            job.transition(UploadStatus::Completed)
        }
    })?;

    if failed {
        tracing::warn!(job_id = %id, "Upload finished with simulated failure");
    } else {
        tracing::info!(job_id = %id, "Upload completed");
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
