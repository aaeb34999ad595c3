//! Community feed for AgroLink.
//!
//! An in-memory feed seeded with mock posts from farmers and agronomists.
//! Visitors can add posts and toggle likes; nothing is persisted.

pub mod error;
pub mod feed;

pub use error::CommunityError;
pub use feed::{CommunityFeed, NewPost, Post};
