//! Web server module
//!
//! Exposes the pipeline over HTTP: a JSON endpoint, a Server-Sent Events
//! stream of stage completions, health and stats.

mod handlers;
mod routes;
mod state;

pub use handlers::{AskRequest, AskResponse, SourceRef};
pub use routes::create_router;
pub use state::AppState;
