//! Integration tests for the AgroLink API.
//!
//! Drives the router with `oneshot` requests covering happy paths and error
//! paths for every endpoint. Each test builds its own state.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agrolink_api::create_router;
use agrolink_api::handlers::HealthResponse;
use agrolink_api::state::AppState;
use agrolink_core::config::AgroConfig;
use agrolink_simulator::UploadSimulator;
use agrolink_youtube::{TrendingResponse, TrendingSource, TrendingVideo, YoutubeError};

// =============================================================================
// Helpers
// =============================================================================

const TRENDING_ERROR: &str = "Failed to fetch trending videos from YouTube";

/// Config with the chat delay removed so tests don't wait on it.
fn test_config() -> AgroConfig {
    let mut config = AgroConfig::default();
    config.assistant.thinking_delay_min_ms = 0;
    config.assistant.thinking_delay_max_ms = 0;
    config
}

fn make_state() -> AppState {
    AppState::new(test_config()).unwrap()
}

fn make_app() -> axum::Router {
    create_router(make_state())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn video(id: &str, views: u64) -> TrendingVideo {
    TrendingVideo {
        id: id.to_string(),
        title: format!("Video {}", id),
        description: String::new(),
        thumbnail: String::new(),
        channel_title: "Farm Channel".to_string(),
        published_at: "2024-01-01T00:00:00Z".to_string(),
        view_count: views,
        like_count: 0,
        duration: "1:00".to_string(),
    }
}

/// Trending source that records the page size it was asked for.
struct StubSource {
    requested: std::sync::Mutex<Vec<u32>>,
    fail: bool,
}

impl StubSource {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            requested: std::sync::Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            requested: std::sync::Mutex::new(Vec::new()),
            fail: true,
        })
    }
}

#[async_trait::async_trait]
impl TrendingSource for StubSource {
    async fn trending(&self, max_results: u32) -> Result<TrendingResponse, YoutubeError> {
        self.requested.lock().unwrap().push(max_results);
        if self.fail {
            return Err(YoutubeError::HttpStatus {
                endpoint: "videos",
                status: 503,
            });
        }
        Ok(TrendingResponse {
            videos: vec![video("b", 50), video("a", 10)],
            total_results: 2,
        })
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let resp = make_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let resp = make_app().oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_reply_matches_keyword() {
    let resp = make_app()
        .oneshot(post_json(
            "/api/chat",
            json!({ "message": "How do I boost my YIELD this season?" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["topic"], "yield");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["reply"]["role"], "assistant");
    assert!(!json["reply"]["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_unmatched_gets_general_reply() {
    let resp = make_app()
        .oneshot(post_json("/api/chat", json!({ "message": "hello there" })))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["topic"], "general");
}

#[tokio::test]
async fn test_chat_empty_message_is_400() {
    let resp = make_app()
        .oneshot(post_json("/api/chat", json!({ "message": "   " })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_chat_transcript_and_clear() {
    let app = make_app();

    let resp = app.clone().oneshot(get("/api/chat/messages")).await.unwrap();
    let json = body_json(resp).await;
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "assistant");

    app.clone()
        .oneshot(post_json(
            "/api/chat",
            json!({ "message": "water use in my irrigation lines" }),
        ))
        .await
        .unwrap();

    let json = body_json(app.clone().oneshot(get("/api/chat/messages")).await.unwrap()).await;
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[2]["role"], "assistant");

    let resp = app.clone().oneshot(delete("/api/chat/messages")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let json = body_json(app.oneshot(get("/api/chat/messages")).await.unwrap()).await;
    assert_eq!(json["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_chat_overlapping_send_is_409_and_pairs_stay_intact() {
    let mut config = test_config();
    config.assistant.thinking_delay_min_ms = 1000;
    config.assistant.thinking_delay_max_ms = 1000;
    let app = create_router(AppState::new(config).unwrap());

    let first = tokio::spawn(app.clone().oneshot(post_json(
        "/api/chat",
        json!({ "message": "yield?" }),
    )));
    tokio::time::sleep(Duration::from_millis(10)).await;

    let resp = app
        .clone()
        .oneshot(post_json("/api/chat", json!({ "message": "soil?" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["error"], "conflict");

    let resp = app.clone().oneshot(delete("/api/chat/messages")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = first.await.unwrap().unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(app.oneshot(get("/api/chat/messages")).await.unwrap()).await;
    let roles: Vec<&str> = json["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["assistant", "user", "assistant"]);
}

// =============================================================================
// Uploads
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_upload_lifecycle() {
    let app = make_app();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/uploads",
            json!({
                "title": "Cover crop walkthrough",
                "file_name": "cover.mp4",
                "tags": ["soil", " soil ", "cover crops"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let job = body_json(resp).await;
    assert_eq!(job["status"], "uploading");
    assert_eq!(job["progress"], 0);
    assert_eq!(job["tags"], json!(["soil", "cover crops"]));
    let id = job["id"].as_str().unwrap().to_string();

    // 20 ticks at the minimum increment reach 100, then 5s of processing.
    tokio::time::sleep(Duration::from_secs(12)).await;

    let resp = app
        .clone()
        .oneshot(get(&format!("/api/uploads/{}", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let job = body_json(resp).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["progress"], 100);
    assert!(job["completed_at"].is_string());

    let json = body_json(app.oneshot(get("/api/uploads")).await.unwrap()).await;
    assert_eq!(json["uploads"].as_array().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_upload_progress_reaches_100_before_processing() {
    let config = test_config();
    let uploads = UploadSimulator::with_increments(config.upload.clone(), Arc::new(|| 30u8));
    let app = create_router(make_state().with_uploads(uploads));

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/uploads",
            json!({ "title": "Drone survey", "file_name": "survey.mp4" }),
        ))
        .await
        .unwrap();
    let id = body_json(resp).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/uploads/{}", id);

    // Sample halfway between 200ms ticks.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let mut last = 0;
    for expected in [30, 60, 90] {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let job = body_json(app.clone().oneshot(get(&uri)).await.unwrap()).await;
        let progress = job["progress"].as_u64().unwrap();
        assert!(progress >= last);
        assert_eq!(progress, expected);
        assert_eq!(job["status"], "uploading");
        last = progress;
    }

    tokio::time::sleep(Duration::from_millis(200)).await;
    let job = body_json(app.oneshot(get(&uri)).await.unwrap()).await;
    assert_eq!(job["progress"], 100);
    assert_eq!(job["status"], "processing");
}

#[tokio::test]
async fn test_upload_missing_title_is_400() {
    let resp = make_app()
        .oneshot(post_json(
            "/api/uploads",
            json!({ "title": "", "file_name": "a.mp4" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_upload_is_404() {
    let resp = make_app()
        .oneshot(get(&format!("/api/uploads/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "not_found");
}

// =============================================================================
// Voice
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_voice_cycle_and_busy_conflict() {
    let app = make_app();

    let resp = app.clone().oneshot(post_empty("/api/voice/start")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let session = body_json(resp).await;
    assert_eq!(session["phase"], "listening");
    assert_eq!(session["is_listening"], true);

    let resp = app.clone().oneshot(post_empty("/api/voice/start")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Mid-speaking: 3s listening + 2s processing, then 1s in.
    tokio::time::sleep(Duration::from_millis(6_000)).await;
    let session = body_json(app.clone().oneshot(get("/api/voice/status")).await.unwrap()).await;
    assert_eq!(session["phase"], "speaking");
    assert_eq!(session["last_topic"], "irrigation");
    let confidence = session["confidence"].as_u64().unwrap();
    assert!((80..=99).contains(&confidence));

    tokio::time::sleep(Duration::from_millis(4_000)).await;
    let session = body_json(app.clone().oneshot(get("/api/voice/status")).await.unwrap()).await;
    assert_eq!(session["phase"], "idle");

    let resp = app.oneshot(post_empty("/api/voice/start")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
}

// =============================================================================
// Community
// =============================================================================

#[tokio::test]
async fn test_community_feed_post_and_like() {
    let app = make_app();

    let json = body_json(app.clone().oneshot(get("/api/community/posts")).await.unwrap()).await;
    let seeded = json["posts"].as_array().unwrap().len();
    assert!(seeded > 0);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/community/posts",
            json!({
                "author": "Sam Okafor",
                "content": "Switched to drip lines on the north field.",
                "tags": ["#irrigation"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post = body_json(resp).await;
    assert_eq!(post["tags"], json!(["irrigation"]));
    assert_eq!(post["likes"], 0);
    let id = post["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(post_empty(&format!("/api/community/posts/{}/like", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let liked = body_json(resp).await;
    assert_eq!(liked["likes"], 1);
    assert_eq!(liked["liked"], true);

    let json = body_json(app.oneshot(get("/api/community/posts")).await.unwrap()).await;
    let posts = json["posts"].as_array().unwrap();
    assert_eq!(posts.len(), seeded + 1);
    assert_eq!(posts[0]["id"], id.as_str());
}

#[tokio::test]
async fn test_like_unknown_post_is_404() {
    let resp = make_app()
        .oneshot(post_empty(&format!(
            "/api/community/posts/{}/like",
            Uuid::new_v4()
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_without_content_is_400() {
    let resp = make_app()
        .oneshot(post_json(
            "/api/community/posts",
            json!({ "author": "Sam", "content": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Trending proxy
// =============================================================================

#[tokio::test]
async fn test_trending_defaults_and_clamps_max_results() {
    let source = StubSource::ok();
    let app = create_router(make_state().with_trending_source(source.clone()));

    let resp = app.clone().oneshot(get("/api/youtube/trending")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["totalResults"], 2);
    assert_eq!(json["videos"][0]["id"], "b");
    assert_eq!(json["videos"][0]["viewCount"], 50);

    app.clone()
        .oneshot(get("/api/youtube/trending?maxResults=500"))
        .await
        .unwrap();
    app.oneshot(get("/api/youtube/trending?maxResults=4"))
        .await
        .unwrap();

    assert_eq!(*source.requested.lock().unwrap(), vec![12, 50, 4]);
}

#[tokio::test]
async fn test_trending_malformed_max_results_uses_default_or_clamp() {
    let source = StubSource::ok();
    let app = create_router(make_state().with_trending_source(source.clone()));

    for uri in [
        "/api/youtube/trending?maxResults=abc",
        "/api/youtube/trending?maxResults=-3",
        "/api/youtube/trending?maxResults=",
    ] {
        let resp = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }

    assert_eq!(*source.requested.lock().unwrap(), vec![12, 1, 12]);
}

#[tokio::test]
async fn test_trending_failure_is_bare_500() {
    let app = create_router(make_state().with_trending_source(StubSource::failing()));

    let resp = app.oneshot(get("/api/youtube/trending")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({ "error": TRENDING_ERROR }));
}

#[tokio::test]
async fn test_trending_without_api_key_is_500() {
    let resp = make_app()
        .oneshot(get("/api/youtube/trending"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({ "error": TRENDING_ERROR }));
}

#[tokio::test]
async fn test_trending_upstream_details_failure_through_router() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": { "videoId": "a" },
                "snippet": { "title": "Drone scouting" }
            }],
            "pageInfo": { "totalResults": 1 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.youtube.api_base_url = server.uri();
    config.youtube.api_key = Some("test-key".to_string());
    let app = create_router(AppState::new(config).unwrap());

    let resp = app.oneshot(get("/api/youtube/trending")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({ "error": TRENDING_ERROR }));
}
