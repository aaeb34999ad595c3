//! Chat conversation: the append-only transcript the responder writes into.
//!
//! Each `send` validates the input, appends the user message, waits out an
//! artificial "thinking" delay, then appends the canned assistant reply.
//! Only one turn is in flight at a time.

use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;

use agrolink_core::config::AssistantConfig;
use agrolink_core::types::Message;

use crate::error::ChatError;
use crate::responder::{IntentResponder, Topic};

/// Result of a single chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The user's message as appended to the transcript.
    pub user: Message,
    /// The assistant's reply as appended to the transcript.
    pub reply: Message,
    /// Topic the responder matched.
    pub topic: Topic,
}

/// Transcript plus the single in-flight turn marker, guarded together.
#[derive(Debug)]
struct Transcript {
    messages: Vec<Message>,
    pending: bool,
}

/// A single in-memory conversation with the farming assistant.
///
/// One turn runs at a time: a `send` or `clear` while a reply is pending is
/// rejected with `ChatError::Busy`, so the transcript always alternates
/// user/assistant after the welcome message.
pub struct Conversation {
    responder: IntentResponder,
    transcript: Mutex<Transcript>,
    config: AssistantConfig,
}

/// Releases the pending marker when a turn ends. If the turn is dropped
/// before its reply lands, the orphaned user message is removed.
struct PendingTurn<'a> {
    conversation: &'a Conversation,
    user: Option<Message>,
}

impl PendingTurn<'_> {
    fn finish(mut self, reply: Message) -> Result<(), ChatError> {
        let mut guard = self.conversation.lock()?;
        guard.messages.push(reply);
        guard.pending = false;
        self.user = None;
        Ok(())
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        let Some(user) = self.user.take() else {
            return;
        };
        if let Ok(mut guard) = self.conversation.transcript.lock() {
            guard.messages.retain(|m| m.id != user.id);
            guard.pending = false;
            tracing::debug!(message_id = %user.id, "Abandoned chat turn rolled back");
        }
    }
}

impl Conversation {
    /// Create a conversation seeded with the welcome message.
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            responder: IntentResponder::new(),
            transcript: Mutex::new(Transcript {
                messages: vec![welcome_message()],
                pending: false,
            }),
            config,
        }
    }

    /// Handle an incoming chat message.
    ///
    /// The lock is released while the thinking delay runs, so readers can
    /// see the user message before the reply lands.
    pub async fn send(&self, text: &str) -> Result<ChatTurn, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let user = Message::user(text);
        let turn = self.begin_turn(user.clone())?;

        let delay = self.thinking_delay();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Assistant thinking");
        tokio::time::sleep(delay).await;

        let canned = self.responder.respond(text);
        let reply = Message::assistant(canned.text, canned.suggestion_list());
        turn.finish(reply.clone())?;

        tracing::info!(topic = ?canned.topic, message_id = %reply.id, "Assistant replied");

        Ok(ChatTurn {
            user,
            reply,
            topic: canned.topic,
        })
    }

    /// Snapshot of the transcript in append order.
    pub fn messages(&self) -> Result<Vec<Message>, ChatError> {
        Ok(self.lock()?.messages.clone())
    }

    /// Whether a reply is currently pending.
    pub fn is_pending(&self) -> Result<bool, ChatError> {
        Ok(self.lock()?.pending)
    }

    /// Reset the transcript to just the welcome message.
    pub fn clear(&self) -> Result<(), ChatError> {
        let mut guard = self.lock()?;
        if guard.pending {
            return Err(ChatError::Busy);
        }
        let dropped = guard.messages.len();
        guard.messages = vec![welcome_message()];
        tracing::info!(dropped, "Conversation cleared");
        Ok(())
    }

    // -- Private helpers --

    fn begin_turn(&self, user: Message) -> Result<PendingTurn<'_>, ChatError> {
        let mut guard = self.lock()?;
        if guard.pending {
            return Err(ChatError::Busy);
        }
        guard.pending = true;
        guard.messages.push(user.clone());
        Ok(PendingTurn {
            conversation: self,
            user: Some(user),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Transcript>, ChatError> {
        self.transcript
            .lock()
            .map_err(|e| ChatError::Transcript(format!("transcript lock poisoned: {}", e)))
    }

    fn thinking_delay(&self) -> Duration {
        let min = self.config.thinking_delay_min_ms;
        let max = self.config.thinking_delay_max_ms.max(min);
        let ms = if min == max {
            min
        } else {
            rand::rng().random_range(min..=max)
        };
        Duration::from_millis(ms)
    }
}

fn welcome_message() -> Message {
    let welcome = IntentResponder::welcome();
    Message::assistant(welcome.text, welcome.suggestion_list())
}

// =============================================================================
// Tests
// =============================================================================
