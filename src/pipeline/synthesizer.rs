//! Final answer writer with numbered citations

use super::prompts;
use super::state::QueryResult;
use super::NO_INFORMATION_MESSAGE;
use crate::llm::LanguageModel;
use std::sync::Arc;
use tracing::{error, info};

/// Writes the long-form answer and appends the reference list
pub struct Synthesizer {
    writer: Arc<dyn LanguageModel>,
    no_information_message: String,
}

impl Synthesizer {
    pub fn new(writer: Arc<dyn LanguageModel>) -> Self {
        Self {
            writer,
            no_information_message: NO_INFORMATION_MESSAGE.to_string(),
        }
    }

    /// Override the answer used when nothing was retrieved
    pub fn with_no_information_message(mut self, message: impl Into<String>) -> Self {
        self.no_information_message = message.into();
        self
    }

    /// Produce the final answer. Never fails: a writer error becomes the
    /// answer text.
    pub async fn write(&self, question: &str, results: &[QueryResult]) -> String {
        info!("Writing final response from {} results", results.len());

        if results.is_empty() {
            return self.no_information_message.clone();
        }

        let prompt = prompts::build_final_response(question, &render_sources(results));

        match self.writer.invoke(&prompt).await {
            Ok(completion) => format!(
                "{}\n\nReferences:\n{}",
                completion.content,
                render_references(results)
            ),
            Err(e) => {
                error!("Failed to write final response: {}", e);
                format!("Error generating response: {}", e)
            }
        }
    }
}

/// Labeled body sections; the 1-based position is the citation number
pub fn render_sources(results: &[QueryResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[{}]\nTitle: {}\nURL: {}\nContent: {}\n----------------\n",
                i + 1,
                r.title,
                r.url,
                r.resume
            )
        })
        .collect()
}

/// `[n] - [title](url)` lines in the same numbering as [`render_sources`]
pub fn render_references(results: &[QueryResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[{}] - [{}]({})", i + 1, r.title, r.url))
        .collect::<Vec<_>>()
        .join("\n")
}
