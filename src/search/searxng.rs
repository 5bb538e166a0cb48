//! SearXNG instance as a search provider

use super::models::{SearchResponse, SourceRecord};
use super::provider::*;
use crate::network::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// A SearXNG instance queried through its JSON output format.
///
/// The instance must have `json` enabled in `search.formats`.
pub struct SearXng {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearXngResponse {
    #[serde(default)]
    results: Vec<SearXngResult>,
}

#[derive(Debug, Deserialize)]
struct SearXngResult {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl SearXng {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for SearXng {
    fn name(&self) -> &str {
        "searxng"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        _include_raw_content: bool,
    ) -> Result<SearchResponse> {
        let url = format!("{}/search", self.base_url);

        debug!("SearXNG search: {}", query);
        let response = self
            .client
            .get_json(&url, &[("q", query), ("format", "json")], &[])
            .await?;

        if !response.is_success() {
            return Err(status_error(self.name(), response));
        }

        let parsed: SearXngResponse = response.json()?;

        // Hits without a title or URL cannot be cited
        let results = parsed
            .results
            .into_iter()
            .filter_map(|r| {
                let url = r.url.filter(|u| !u.is_empty())?;
                let title = r.title.filter(|t| !t.is_empty())?;
                Some(SourceRecord::new(title, url, r.content.unwrap_or_default()))
            })
            .take(max_results)
            .collect();

        Ok(SearchResponse::new(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_takes_top_hits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust async"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "rust async",
                "results": [
                    {"url": "", "title": "broken"},
                    {"url": "https://tokio.rs", "title": "Tokio", "content": "An async runtime", "engine": "brave"},
                    {"url": "https://rust-lang.org", "title": "Rust", "content": null}
                ]
            })))
            .mount(&server)
            .await;

        let searx = SearXng::new(HttpClient::new().unwrap(), format!("{}/", server.uri()));
        let response = searx.search("rust async", 1, true).await.unwrap();

        assert_eq!(response.results.len(), 1);
        let hit = response.first().unwrap();
        assert_eq!(hit.url, "https://tokio.rs");
        assert_eq!(hit.content, "An async runtime");
        assert!(hit.raw_content.is_none());
    }

    #[tokio::test]
    async fn test_json_format_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let searx = SearXng::new(HttpClient::new().unwrap(), server.uri());
        let err = searx.search("x", 1, false).await.unwrap_err();
        assert!(matches!(err, SearchError::Status { status: 403, .. }));
    }
}
