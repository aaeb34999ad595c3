//! The community feed: seeded mock posts plus visitor posts and likes.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CommunityError;

/// Maximum post length in characters.
const MAX_CONTENT_LENGTH: usize = 2000;

/// Maximum number of tags on a post.
const MAX_TAGS: usize = 10;

/// A post in the community feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author: String,
    pub author_role: String,
    pub location: String,
    pub content: String,
    pub tags: Vec<String>,
    pub likes: u32,
    pub comments: u32,
    /// Whether the current visitor has liked this post.
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of a new post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub author: String,
    #[serde(default)]
    pub author_role: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// In-memory feed, newest post first.
#[derive(Debug)]
pub struct CommunityFeed {
    posts: Mutex<Vec<Post>>,
}

impl Default for CommunityFeed {
    fn default() -> Self {
        Self::seeded()
    }
}

impl CommunityFeed {
    /// An empty feed.
    pub fn empty() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
        }
    }

    /// A feed pre-populated with the demo posts.
    pub fn seeded() -> Self {
        Self {
            posts: Mutex::new(seed_posts(Utc::now())),
        }
    }

    /// All posts, newest first.
    pub fn list(&self) -> Result<Vec<Post>, CommunityError> {
        Ok(self.lock()?.clone())
    }

    /// Validate and publish a new post at the top of the feed.
    pub fn create(&self, new: NewPost) -> Result<Post, CommunityError> {
        let author = new.author.trim();
        let content = new.content.trim();
        if author.is_empty() {
            return Err(CommunityError::InvalidPost("author is required".to_string()));
        }
        if content.is_empty() {
            return Err(CommunityError::InvalidPost("content is required".to_string()));
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(CommunityError::InvalidPost(format!(
                "content exceeds {} characters",
                MAX_CONTENT_LENGTH
            )));
        }

        let mut tags: Vec<String> = Vec::new();
        for tag in new.tags.iter().map(|t| t.trim().trim_start_matches('#')) {
            if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag.to_string());
            }
        }
        tags.truncate(MAX_TAGS);

        let post = Post {
            id: Uuid::new_v4(),
            author: author.to_string(),
            author_role: new
                .author_role
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "Community Member".to_string()),
            location: new.location.unwrap_or_default(),
            content: content.to_string(),
            tags,
            likes: 0,
            comments: 0,
            liked: false,
            created_at: Utc::now(),
        };

        self.lock()?.insert(0, post.clone());
        tracing::info!(post_id = %post.id, author = %post.author, "Community post created");
        Ok(post)
    }

    /// Flip the visitor's like on a post and return the updated post.
    pub fn toggle_like(&self, id: Uuid) -> Result<Post, CommunityError> {
        let mut posts = self.lock()?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CommunityError::PostNotFound(id))?;
        if post.liked {
            post.likes = post.likes.saturating_sub(1);
        } else {
            post.likes = post.likes.saturating_add(1);
        }
        post.liked = !post.liked;
        tracing::debug!(post_id = %id, liked = post.liked, likes = post.likes, "Like toggled");
        Ok(post.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Post>>, CommunityError> {
        self.posts
            .lock()
            .map_err(|e| CommunityError::State(format!("feed lock poisoned: {}", e)))
    }
}

fn seed_posts(now: DateTime<Utc>) -> Vec<Post> {
    let seed = |hours_ago: i64,
                author: &str,
                role: &str,
                location: &str,
                content: &str,
                tags: &[&str],
                likes: u32,
                comments: u32| Post {
        id: Uuid::new_v4(),
        author: author.to_string(),
        author_role: role.to_string(),
        location: location.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        likes,
        comments,
        liked: false,
        created_at: now - Duration::hours(hours_ago),
    };

    vec![
        seed(
            2,
            "Maria Santos",
            "Organic Vegetable Farmer",
            "Salinas Valley, CA",
            "Switched to drip irrigation with soil moisture sensors this season. Water use is down 35% and the lettuce has never looked better.",
            &["irrigation", "water-saving", "organic"],
            124,
            18,
        ),
        seed(
            5,
            "James Okafor",
            "Agronomist",
            "Iowa, USA",
            "Reminder for corn growers: split your nitrogen applications. Our trial plots showed an 8 bu/acre gain over a single pre-plant pass.",
            &["corn", "nitrogen", "yield"],
            89,
            23,
        ),
        seed(
            9,
            "Priya Sharma",
            "Rice Farmer",
            "Punjab, India",
            "First season using drone NDVI maps to scout for stress. Caught a blast outbreak a week earlier than we would have on foot.",
            &["drones", "precision-ag", "rice"],
            156,
            31,
        ),
        seed(
            20,
            "Tom Becker",
            "Dairy & Grain Farmer",
            "Bavaria, Germany",
            "Third year of cereal rye cover crops. Earthworm counts have doubled and the heavy clay finally drains after spring rain.",
            &["cover-crops", "soil-health"],
            72,
            9,
        ),
        seed(
            30,
            "Aisha Mwangi",
            "AgTech Cooperative Lead",
            "Nakuru, Kenya",
            "Our co-op pooled funds for a shared weather station network. Members now get frost and rain alerts by SMS. Happy to share the setup details!",
            &["weather", "cooperative", "smallholders"],
            203,
            44,
        ),
    ]
}

// =============================================================================
// Tests
// =============================================================================
