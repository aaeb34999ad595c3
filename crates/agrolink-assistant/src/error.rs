//! Error types for the farming assistant.

use agrolink_core::error::AgroError;

/// Errors from the chat conversation.
///
/// The responder itself never fails; these cover input validation and the
/// shared transcript.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("assistant is still answering the previous message")]
    Busy,
    #[error("transcript error: {0}")]
    Transcript(String),
}

impl From<ChatError> for AgroError {
    fn from(err: ChatError) -> Self {
        AgroError::Api(err.to_string())
    }
}
