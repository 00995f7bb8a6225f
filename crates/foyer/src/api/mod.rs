//! HTTP API module.
//!
//! The browser-facing surface: streaming chat proxy, session CRUD relay and
//! router assembly.

pub mod chat;
mod error;
pub mod relay;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
