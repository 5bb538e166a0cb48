//! Search provider trait

use super::models::SearchResponse;
use crate::error::SearchError;
use crate::network::HttpResponse;
use async_trait::async_trait;

/// Result alias for provider calls
pub type Result<T> = std::result::Result<T, SearchError>;

/// A web search backend returning Tavily-shaped results
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Search for `query`, returning at most `max_results` hits
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        include_raw_content: bool,
    ) -> Result<SearchResponse>;
}

/// Error for a non-2xx provider answer
pub(crate) fn status_error(provider: &str, response: HttpResponse) -> SearchError {
    if response.is_rate_limited() {
        SearchError::RateLimited(provider.to_string())
    } else {
        SearchError::Status {
            provider: provider.to_string(),
            status: response.status,
            body: response.text,
        }
    }
}
