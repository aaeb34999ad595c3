//! Error types for the community feed.

use agrolink_core::error::AgroError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CommunityError {
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("invalid post: {0}")]
    InvalidPost(String),
    #[error("feed state error: {0}")]
    State(String),
}

impl From<CommunityError> for AgroError {
    fn from(err: CommunityError) -> Self {
        AgroError::Api(err.to_string())
    }
}
