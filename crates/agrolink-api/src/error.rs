//! API error types and JSON error response formatting.
//!
//! ApiError provides a consistent JSON error response format across all
//! endpoints, mapping subsystem errors to appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use agrolink_assistant::ChatError;
use agrolink_community::CommunityError;
use agrolink_simulator::SimulatorError;

/// Message returned for every trending proxy failure.
pub const TRENDING_ERROR: &str = "Failed to fetch trending videos from YouTube";

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code, or the full message for upstream failures.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    BadRequest(String),
    /// 404 Not Found - resource does not exist.
    NotFound(String),
    /// 409 Conflict - state conflict (e.g., voice session already running).
    Conflict(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
    /// 500 with a bare `{error}` body - the upstream video API failed.
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, coded("bad_request", msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, coded("not_found", msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, coded("conflict", msg)),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, coded("internal_error", msg))
            }
            ApiError::Upstream(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: msg,
                    message: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn coded(code: &str, message: String) -> ErrorBody {
    ErrorBody {
        error: code.to_string(),
        message: Some(message),
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage | ChatError::MessageTooLong(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ChatError::Busy => ApiError::Conflict(err.to_string()),
            ChatError::Transcript(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SimulatorError> for ApiError {
    fn from(err: SimulatorError) -> Self {
        match err {
            SimulatorError::InvalidRequest(_) => ApiError::BadRequest(err.to_string()),
            SimulatorError::UploadNotFound(_) => ApiError::NotFound(err.to_string()),
            SimulatorError::Busy(_) => ApiError::Conflict(err.to_string()),
            SimulatorError::InvalidTransition { .. } | SimulatorError::State(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<CommunityError> for ApiError {
    fn from(err: CommunityError) -> Self {
        match err {
            CommunityError::InvalidPost(_) => ApiError::BadRequest(err.to_string()),
            CommunityError::PostNotFound(_) => ApiError::NotFound(err.to_string()),
            CommunityError::State(_) => ApiError::Internal(err.to_string()),
        }
    }
}
