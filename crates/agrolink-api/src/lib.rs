//! AgroLink API crate - axum HTTP server and route handlers.
//!
//! Exposes the farming assistant chat, the upload and voice simulators, the
//! community feed, and the trending video proxy as JSON endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
