//! Two-step trending lookup: search, then enrich with statistics.

use std::collections::HashMap;
use std::time::Duration;

use rand::seq::IndexedRandom;

use agrolink_core::config::YoutubeConfig;

use crate::error::YoutubeError;
use crate::types::{
    format_duration, parse_count, SearchListResponse, TrendingResponse, TrendingVideo,
    VideoListResponse,
};

/// Largest page the upstream API will return.
const MAX_RESULTS_LIMIT: u32 = 50;

/// Clamp a caller-supplied `maxResults` to 1..=50, using `default` when absent.
pub fn resolve_max_results(requested: Option<u32>, default: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, MAX_RESULTS_LIMIT)
}

/// Anything that can produce the trending list.
#[async_trait::async_trait]
pub trait TrendingSource: Send + Sync {
    async fn trending(&self, max_results: u32) -> Result<TrendingResponse, YoutubeError>;
}

/// reqwest-backed client for the YouTube Data API v3.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    query_terms: Vec<String>,
}

impl YoutubeClient {
    pub fn new(config: &YoutubeConfig) -> Result<Self, YoutubeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            query_terms: config.query_terms.clone(),
        })
    }

    /// Random search term from the configured list.
    fn pick_term(&self) -> &str {
        self.query_terms
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or("agriculture technology")
    }

    async fn search(
        &self,
        key: &str,
        term: &str,
        max_results: u32,
    ) -> Result<SearchListResponse, YoutubeError> {
        let max_results = max_results.to_string();
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("q", term),
                ("type", "video"),
                ("order", "viewCount"),
                ("maxResults", max_results.as_str()),
                ("key", key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::HttpStatus {
                endpoint: "search",
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    async fn video_details(
        &self,
        key: &str,
        ids: &[String],
    ) -> Result<VideoListResponse, YoutubeError> {
        let joined = ids.join(",");
        let response = self
            .http
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "statistics,contentDetails"),
                ("id", joined.as_str()),
                ("key", key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::HttpStatus {
                endpoint: "videos",
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl TrendingSource for YoutubeClient {
    async fn trending(&self, max_results: u32) -> Result<TrendingResponse, YoutubeError> {
        let key = self.api_key.as_deref().ok_or(YoutubeError::MissingApiKey)?;
        let term = self.pick_term().to_string();
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);

        tracing::debug!(term = %term, max_results, "Searching trending videos");
        let search = self.search(key, &term, max_results).await?;

        let ids: Vec<String> = search
            .items
            .iter()
            .filter_map(|item| item.id.video_id.clone())
            .collect();

        let details = if ids.is_empty() {
            HashMap::new()
        } else {
            self.video_details(key, &ids)
                .await?
                .items
                .into_iter()
                .map(|v| (v.id.clone(), v))
                .collect::<HashMap<_, _>>()
        };

        let mut videos: Vec<TrendingVideo> = search
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id?;
                let detail = details.get(&id);
                Some(TrendingVideo {
                    title: item.snippet.title,
                    description: item.snippet.description,
                    thumbnail: item.snippet.thumbnails.best_url(),
                    channel_title: item.snippet.channel_title,
                    published_at: item.snippet.published_at,
                    view_count: parse_count(
                        detail.and_then(|d| d.statistics.view_count.as_deref()),
                    ),
                    like_count: parse_count(
                        detail.and_then(|d| d.statistics.like_count.as_deref()),
                    ),
                    duration: format_duration(
                        detail
                            .map(|d| d.content_details.duration.as_str())
                            .unwrap_or(""),
                    ),
                    id,
                })
            })
            .collect();

        videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));

        tracing::info!(
            term = %term,
            count = videos.len(),
            total_results = search.page_info.total_results,
            "Trending videos fetched"
        );

        Ok(TrendingResponse {
            videos,
            total_results: search.page_info.total_results,
        })
    }
}
