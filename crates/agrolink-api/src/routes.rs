//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression,
//! and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use agrolink_core::config::AgroConfig;
use agrolink_core::error::AgroError;

use crate::handlers;
use crate::state::AppState;

/// Local origins allowed to call the API: the server itself and a dev
/// frontend on the next port up.
fn local_origins(port: u16) -> Vec<HeaderValue> {
    let dev_port = port.saturating_add(1);
    [port, dev_port]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect()
}

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(local_origins(state.config.general.port)))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let api_routes = Router::new()
        .route("/chat", post(handlers::send_chat))
        .route(
            "/chat/messages",
            get(handlers::chat_messages).delete(handlers::clear_chat),
        )
        .route(
            "/uploads",
            get(handlers::list_uploads).post(handlers::create_upload),
        )
        .route("/uploads/{id}", get(handlers::get_upload))
        .route("/voice/start", post(handlers::voice_start))
        .route("/voice/status", get(handlers::voice_status))
        .route(
            "/community/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/community/posts/{id}/like", post(handlers::toggle_like))
        .route("/youtube/trending", get(handlers::trending));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
///
/// Binds to 127.0.0.1 (localhost only) on the port from config and serves
/// until `shutdown` resolves.
pub async fn start_server(
    config: &AgroConfig,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), AgroError> {
    let addr = format!("127.0.0.1:{}", config.general.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AgroError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AgroError::Api(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_origins_cover_server_and_dev_port() {
        let origins = local_origins(3000);
        assert_eq!(origins.len(), 4);
        assert!(origins.contains(&HeaderValue::from_static("http://localhost:3000")));
        assert!(origins.contains(&HeaderValue::from_static("http://127.0.0.1:3001")));
    }
}
