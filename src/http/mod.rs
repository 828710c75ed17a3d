//! HTTP API for browsing saved sessions from an external front-end
//!
//! - GET /sessions - List saved sessions (newest first)
//! - GET /sessions/:id - Title and transcript for one session
//! - PUT /sessions/:id/title - One-time title addition
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
