use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Chat transcript
// =============================================================================

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person typing into the chat box.
    User,
    /// The canned farming assistant.
    Assistant,
}

/// A single turn in the assistant conversation.
///
/// Messages are immutable once appended to a transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Follow-up prompts offered alongside assistant replies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Message {
    /// Create a user message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
            suggestions: Vec::new(),
        }
    }

    /// Create an assistant message with follow-up suggestions.
    pub fn assistant(text: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            suggestions,
        }
    }
}
