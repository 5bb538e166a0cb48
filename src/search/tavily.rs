//! Tavily search provider

use super::models::SearchResponse;
use super::provider::*;
use crate::error::SearchError;
use crate::network::HttpClient;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Tavily web search API
pub struct Tavily {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: usize,
    include_raw_content: bool,
}

impl Tavily {
    pub fn new(client: HttpClient, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: "https://api.tavily.com".to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for Tavily {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        include_raw_content: bool,
    ) -> Result<SearchResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SearchError::MissingApiKey(self.name().to_string()))?;

        let url = format!("{}/search", self.base_url);
        let body = TavilyRequest {
            query,
            max_results,
            include_raw_content,
        };
        let auth = format!("Bearer {}", api_key);

        debug!("Tavily search: {}", query);
        let response = self
            .client
            .post_json(&url, &body, &[("Authorization", auth.as_str())])
            .await?;

        if !response.is_success() {
            return Err(status_error(self.name(), response));
        }

        let mut parsed: SearchResponse = response.json()?;
        parsed.results.truncate(max_results);
        Ok(parsed)
    }
}
