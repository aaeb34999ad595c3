pub mod config;
pub mod error;
pub mod types;

pub use config::AgroConfig;
pub use error::{AgroError, Result};
pub use types::*;
