//! Trending agriculture videos from the YouTube Data API.
//!
//! Runs one search for a randomly chosen farming term, enriches the hits with
//! statistics from a second lookup, and sorts them by view count.

pub mod client;
pub mod error;
pub mod types;

pub use client::{resolve_max_results, TrendingSource, YoutubeClient};
pub use error::YoutubeError;
pub use types::{TrendingResponse, TrendingVideo};
