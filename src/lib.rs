//! WebSynth-RS: answers questions from the web with cited reports
//!
//! A question is decomposed into search queries, each query's top source
//! is condensed by a language model, and a second model writes the final
//! answer with numbered citations matching a reference list.

pub mod config;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod network;
pub mod pipeline;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::{LlmError, SearchError};
pub use pipeline::{Pipeline, PipelineState, QueryResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
