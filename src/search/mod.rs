//! Web search module
//!
//! Defines the provider contract consumed by the pipeline and the
//! Tavily, SearXNG and Perplexity implementations.

mod format;
mod models;
mod provider;

pub mod perplexity;
pub mod searxng;
pub mod tavily;

pub use format::{truncate_content, TRUNCATION_MARKER};
pub use models::*;
pub use provider::*;

use crate::config::SearchSettings;
use crate::error::SearchError;
use crate::network::HttpClient;
use std::sync::Arc;
use tracing::info;

/// Build the configured search provider
pub fn from_settings(
    settings: &SearchSettings,
    client: &HttpClient,
) -> std::result::Result<Arc<dyn SearchProvider>, SearchError> {
    let provider: Arc<dyn SearchProvider> = match settings.provider.trim().to_lowercase().as_str() {
        "tavily" => {
            let mut tavily = tavily::Tavily::new(client.clone(), settings.api_key.clone());
            if let Some(ref base_url) = settings.base_url {
                tavily = tavily.with_base_url(base_url.clone());
            }
            Arc::new(tavily)
        }
        "searxng" => {
            let base_url = settings
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:8080".to_string());
            Arc::new(searxng::SearXng::new(client.clone(), base_url))
        }
        "perplexity" => {
            let mut pplx = perplexity::Perplexity::new(
                client.clone(),
                settings.api_key.clone(),
                settings.model.clone(),
            );
            if let Some(ref base_url) = settings.base_url {
                pplx = pplx.with_base_url(base_url.clone());
            }
            Arc::new(pplx)
        }
        other => return Err(SearchError::UnknownProvider(other.to_string())),
    };

    info!("Search provider: {}", provider.name());
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_selection() {
        let client = HttpClient::new().unwrap();
        let mut settings = SearchSettings::default();

        let provider = from_settings(&settings, &client).unwrap();
        assert_eq!(provider.name(), "tavily");

        settings.provider = "SearXNG".to_string();
        let provider = from_settings(&settings, &client).unwrap();
        assert_eq!(provider.name(), "searxng");

        settings.provider = "bing".to_string();
        assert!(matches!(
            from_settings(&settings, &client),
            Err(SearchError::UnknownProvider(_))
        ));
    }
}
