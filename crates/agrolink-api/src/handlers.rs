//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query/path parameters via axum extractors,
//! interacts with AppState services, and returns JSON responses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agrolink_assistant::Topic;
use agrolink_community::{NewPost, Post};
use agrolink_core::types::Message;
use agrolink_simulator::{UploadJob, UploadRequest, VoiceSession};
use agrolink_youtube::{resolve_max_results, TrendingResponse};

use crate::error::{ApiError, TRENDING_ERROR};
use crate::state::AppState;

// =============================================================================
// Request / query types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Raw `maxResults`; parsed leniently so junk falls back to the default.
#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    #[serde(rename = "maxResults")]
    pub max_results: Option<String>,
}

impl TrendingParams {
    /// Numeric page size if one was given. Negatives become 0 and are
    /// clamped up later; non-numeric input counts as absent.
    pub fn requested(&self) -> Option<u32> {
        let raw = self.max_results.as_deref()?.trim();
        let value: i64 = raw.parse().ok()?;
        Some(value.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub topic: Topic,
    pub user: Message,
    pub reply: Message,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct UploadsResponse {
    pub uploads: Vec<UploadJob>,
}

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
}

// =============================================================================
// Health
// =============================================================================

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// =============================================================================
// Assistant chat
// =============================================================================

/// POST /api/chat - send a message and wait for the assistant's reply.
pub async fn send_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let turn = state.conversation.send(&body.message).await?;
    tracing::debug!(topic = ?turn.topic, "Chat turn completed");
    Ok(Json(ChatResponse {
        topic: turn.topic,
        user: turn.user,
        reply: turn.reply,
    }))
}

/// GET /api/chat/messages - the full transcript, oldest first.
pub async fn chat_messages(
    State(state): State<AppState>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let messages = state.conversation.messages()?;
    Ok(Json(MessagesResponse { messages }))
}

/// DELETE /api/chat/messages - reset the transcript to the welcome message.
pub async fn clear_chat(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.conversation.clear()?;
    tracing::info!("Chat transcript cleared");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Uploads
// =============================================================================

/// POST /api/uploads - start a simulated upload.
pub async fn create_upload(
    State(state): State<AppState>,
    Json(body): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadJob>), ApiError> {
    let job = state.uploads.start_upload(body)?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/uploads - all uploads, newest first.
pub async fn list_uploads(
    State(state): State<AppState>,
) -> Result<Json<UploadsResponse>, ApiError> {
    let uploads = state.uploads.list()?;
    Ok(Json(UploadsResponse { uploads }))
}

/// GET /api/uploads/{id} - one upload.
pub async fn get_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadJob>, ApiError> {
    Ok(Json(state.uploads.get(id)?))
}

// =============================================================================
// Voice
// =============================================================================

/// POST /api/voice/start - begin the listen/process/speak cycle.
pub async fn voice_start(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<VoiceSession>), ApiError> {
    let session = state.voice.start()?;
    Ok((StatusCode::ACCEPTED, Json(session)))
}

/// GET /api/voice/status - current voice session snapshot.
pub async fn voice_status(State(state): State<AppState>) -> Result<Json<VoiceSession>, ApiError> {
    Ok(Json(state.voice.status()?))
}

// =============================================================================
// Community
// =============================================================================

/// GET /api/community/posts - the feed, newest first.
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<PostsResponse>, ApiError> {
    let posts = state.feed.list()?;
    Ok(Json(PostsResponse { posts }))
}

/// POST /api/community/posts - publish a post.
pub async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<NewPost>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.feed.create(body)?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/community/posts/{id}/like - toggle the visitor's like.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.feed.toggle_like(id)?))
}

// =============================================================================
// Trending videos proxy
// =============================================================================

/// GET /api/youtube/trending?maxResults=N - agriculture videos by view count.
///
/// Any upstream failure collapses into a single static 500 body.
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let max_results =
        resolve_max_results(params.requested(), state.config.youtube.default_max_results);

    match state.trending.trending(max_results).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!(error = %e, max_results, "Trending lookup failed");
            Err(ApiError::Upstream(TRENDING_ERROR.to_string()))
        }
    }
}
