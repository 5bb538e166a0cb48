//! Language model traits and types

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result alias for model calls
pub type Result<T> = std::result::Result<T, LlmError>;

/// Text produced by a model invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
}

impl Completion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A text-completion service, optionally able to fill a JSON schema
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier
    fn name(&self) -> &str;

    /// Complete a prompt
    async fn invoke(&self, prompt: &str) -> Result<Completion>;

    /// Whether `invoke_structured` is available
    fn supports_structured_output(&self) -> bool {
        false
    }

    /// Complete a prompt with output constrained to `schema`
    async fn invoke_structured(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        Err(LlmError::StructuredUnsupported(self.name().to_string()))
    }
}
