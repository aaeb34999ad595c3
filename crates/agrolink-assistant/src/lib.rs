//! Farming assistant for AgroLink.
//!
//! Keyword-matching responder over a fixed table of canned replies, plus the
//! chat transcript that records each turn.

pub mod conversation;
pub mod error;
pub mod responder;

pub use conversation::{ChatTurn, Conversation};
pub use error::ChatError;
pub use responder::{CannedReply, IntentResponder, Topic};
