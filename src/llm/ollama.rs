//! Ollama model backend

use super::traits::*;
use crate::config::LlmSettings;
use crate::error::LlmError;
use crate::network::{HttpClient, HttpResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single model served by an Ollama instance
pub struct Ollama {
    client: HttpClient,
    base_url: String,
    model: String,
    options: GenerateOptions,
}

#[derive(Debug, Clone, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<u32>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a serde_json::Value>,
    options: &'a GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl Ollama {
    pub fn new(client: HttpClient, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            options: GenerateOptions::default(),
        }
    }

    /// Create a backend for `model` using the sampling options in `settings`
    pub fn from_settings(client: HttpClient, settings: &LlmSettings, model: &str) -> Self {
        let mut ollama = Self::new(client, settings.base_url.clone(), model);
        ollama.options = GenerateOptions {
            temperature: settings.temperature,
            num_predict: settings.num_predict,
            num_ctx: settings.num_ctx,
        };
        ollama
    }

    async fn generate(&self, prompt: &str, format: Option<&serde_json::Value>) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format,
            options: &self.options,
        };

        debug!("Ollama {}: prompt of {} chars", self.model, prompt.len());
        let response = self.client.post_json(&url, &request, &[]).await?;
        Self::check_status(&response)?;

        let body: GenerateResponse = response.json()?;
        Ok(body.response)
    }

    fn check_status(response: &HttpResponse) -> Result<()> {
        if response.is_success() {
            Ok(())
        } else {
            Err(LlmError::Status {
                status: response.status,
                body: response.text.clone(),
            })
        }
    }
}

#[async_trait]
impl LanguageModel for Ollama {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, prompt: &str) -> Result<Completion> {
        let text = self.generate(prompt, None).await?;
        Ok(Completion::new(text))
    }

    fn supports_structured_output(&self) -> bool {
        true
    }

    async fn invoke_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let text = self.generate(prompt, Some(schema)).await?;
        Ok(serde_json::from_str(&text)?)
    }
}
