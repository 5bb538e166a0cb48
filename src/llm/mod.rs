//! Language model backends
//!
//! Two roles use this module: the planner/summarizer model and the
//! long-form writer model.

mod ollama;
mod traits;

pub use ollama::Ollama;
pub use traits::*;

use crate::config::Settings;
use crate::network::HttpClient;
use std::sync::Arc;

/// Build the planner/summarizer and writer models from settings
pub fn from_settings(
    settings: &Settings,
    client: &HttpClient,
) -> (Arc<dyn LanguageModel>, Arc<dyn LanguageModel>) {
    let planner = Ollama::from_settings(client.clone(), &settings.llm, &settings.llm.planner_model);
    let writer = Ollama::from_settings(client.clone(), &settings.llm, &settings.llm.writer_model);
    (Arc::new(planner), Arc::new(writer))
}
