//! Search result data models

use serde::{Deserialize, Serialize};

/// One normalized search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Snippet chosen by the provider
    #[serde(default)]
    pub content: String,
    /// Long-form page content, when requested and available
    #[serde(default)]
    pub raw_content: Option<String>,
}

impl SourceRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            raw_content: None,
        }
    }

    pub fn with_raw_content(mut self, raw: impl Into<String>) -> Self {
        self.raw_content = Some(raw.into());
        self
    }

    /// Long-form content if present and non-blank, else the snippet
    pub fn best_content(&self) -> &str {
        match self.raw_content.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => &self.content,
        }
    }
}

/// Provider answer for one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Hits in provider rank order; absent means no hit
    #[serde(default)]
    pub results: Vec<SourceRecord>,
}

impl SearchResponse {
    pub fn new(results: Vec<SourceRecord>) -> Self {
        Self { results }
    }

    /// Top-ranked hit, if any
    pub fn first(&self) -> Option<&SourceRecord> {
        self.results.first()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
