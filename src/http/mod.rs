//! HTTP server for the browser UI
//!
//! This module serves the single-page UI and its one API endpoint:
//! - GET  /            - UI page (static assets)
//! - POST /api/analyze - Transcribe an uploaded clip and score its sentiment
//! - GET  /health      - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
