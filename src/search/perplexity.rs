//! Perplexity chat API used as a search provider

use super::models::{SearchResponse, SourceRecord};
use super::provider::*;
use crate::error::SearchError;
use crate::network::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const DEFAULT_CITATION: &str = "https://perplexity.ai";

/// Perplexity's LLM-first search, reshaped into ranked hits.
///
/// The answer text becomes the first hit, attributed to the first citation;
/// the remaining citations follow as content-less hits.
pub struct Perplexity {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

impl Perplexity {
    pub fn new(client: HttpClient, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: "https://api.perplexity.ai".to_string(),
            api_key,
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn to_results(content: String, citations: Vec<String>) -> Vec<SourceRecord> {
        let mut citations = citations.into_iter();
        let first_url = citations
            .next()
            .unwrap_or_else(|| DEFAULT_CITATION.to_string());

        let mut results = vec![SourceRecord::new(
            "Perplexity Search 1, Source 1",
            first_url,
            content.clone(),
        )
        .with_raw_content(content)];

        for (i, url) in citations.enumerate() {
            results.push(SourceRecord::new(
                format!("Perplexity Search 1, Source {}", i + 2),
                url,
                "See above.",
            ));
        }
        results
    }
}

#[async_trait]
impl SearchProvider for Perplexity {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        _include_raw_content: bool,
    ) -> Result<SearchResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SearchError::MissingApiKey(self.name().to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": "Search the web and provide factual information with sources."},
                {"role": "user", "content": query},
            ],
        });
        let auth = format!("Bearer {}", api_key);

        debug!("Perplexity search: {}", query);
        let response = self
            .client
            .post_json(&url, &body, &[("Authorization", auth.as_str())])
            .await?;

        if !response.is_success() {
            return Err(status_error(self.name(), response));
        }

        let parsed: ChatResponse = response.json()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SearchError::InvalidResponse("no choices in response".to_string()))?;

        let mut results = Self::to_results(content, parsed.citations);
        results.truncate(max_results);
        Ok(SearchResponse::new(results))
    }
}
