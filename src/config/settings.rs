//! Settings structures for WebSynth-RS configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Upper bound on the queries one plan may contain
pub const MAX_PLANNED_QUERIES: usize = 5;

/// Main settings structure loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    pub llm: LlmSettings,
    pub pipeline: PipelineSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable lookup
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("WEBSYNTH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("WEBSYNTH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("WEBSYNTH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("WEBSYNTH_SEARCH_PROVIDER") {
            self.search.provider = val;
        }

        // Provider names are matched case-insensitively everywhere
        self.search.provider = self.search.provider.trim().to_lowercase();

        // Provider keys only apply to the provider they belong to
        match self.search.provider.as_str() {
            "tavily" => {
                if let Some(val) = lookup("TAVILY_API_KEY") {
                    self.search.api_key = Some(val);
                }
            }
            "perplexity" => {
                if let Some(val) = lookup("PERPLEXITY_API_KEY") {
                    self.search.api_key = Some(val);
                }
            }
            "searxng" => {
                if let Some(val) = lookup("SEARXNG_URL") {
                    self.search.base_url = Some(val);
                }
            }
            _ => {}
        }

        if let Some(val) = lookup("OLLAMA_HOST") {
            self.llm.base_url = val;
        }
        if let Some(val) = lookup("WEBSYNTH_PLANNER_MODEL") {
            self.llm.planner_model = val;
        }
        if let Some(val) = lookup("WEBSYNTH_WRITER_MODEL") {
            self.llm.writer_model = val;
        }
    }

    /// Reject settings that would only fail once a question arrives
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.llm.base_url)
            .with_context(|| format!("Invalid llm.base_url: {}", self.llm.base_url))?;
        if let Some(ref base_url) = self.search.base_url {
            Url::parse(base_url)
                .with_context(|| format!("Invalid search.base_url: {}", base_url))?;
        }
        if !(1..=MAX_PLANNED_QUERIES).contains(&self.pipeline.max_queries) {
            anyhow::bail!(
                "pipeline.max_queries must be between 1 and {}, got {}",
                MAX_PLANNED_QUERIES,
                self.pipeline.max_queries
            );
        }
        if self.pipeline.no_information_message.trim().is_empty() {
            anyhow::bail!("pipeline.no_information_message must not be empty");
        }
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name reported by the API
    pub instance_name: String,
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "WebSynth".to_string(),
            enable_metrics: true,
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Upper bound on one question, in seconds
    pub run_timeout: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
            run_timeout: 600,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds; local models can be slow
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 120.0,
            pool_maxsize: 10,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Provider name: tavily, searxng or perplexity
    pub provider: String,
    /// API key if the provider requires one
    pub api_key: Option<String>,
    /// Override of the provider endpoint
    pub base_url: Option<String>,
    /// Ask for the long-form page content
    pub include_raw_content: bool,
    /// Cut the selected content to this many characters before summarizing
    pub max_content_chars: Option<usize>,
    /// Model used by the perplexity provider
    pub model: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: "tavily".to_string(),
            api_key: None,
            base_url: None,
            include_raw_content: true,
            max_content_chars: None,
            model: "sonar".to_string(),
        }
    }
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Ollama server URL
    pub base_url: String,
    /// Model that plans queries and condenses search results
    pub planner_model: String,
    /// Model that writes the final answer
    pub writer_model: String,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub num_predict: Option<u32>,
    /// Context window size
    pub num_ctx: Option<u32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            planner_model: "llama3:8b-instruct-q4_K_S".to_string(),
            writer_model: "deepseek-r1:14b".to_string(),
            temperature: None,
            num_predict: None,
            num_ctx: None,
        }
    }
}

/// How the planner turns model output into queries
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanningMode {
    /// Structured when the planner model supports it, lines otherwise
    #[default]
    Auto,
    /// Schema-constrained JSON list
    Structured,
    /// One query per line of free text
    Lines,
}

/// Pipeline behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Query extraction mode
    pub planning: PlanningMode,
    /// Maximum number of planned queries
    pub max_queries: usize,
    /// Lines this short or shorter are discarded by the line parser
    pub min_query_len: usize,
    /// Condense each source with the planner model
    pub summarize: bool,
    /// Answer returned when no source survives the search loop
    pub no_information_message: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            planning: PlanningMode::Auto,
            max_queries: MAX_PLANNED_QUERIES,
            min_query_len: 3,
            summarize: true,
            no_information_message: crate::pipeline::NO_INFORMATION_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8888);
        assert!(!settings.general.debug);
        assert_eq!(settings.search.provider, "tavily");
        assert_eq!(settings.pipeline.max_queries, 5);
        assert!(settings.pipeline.summarize);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
search:
  provider: searxng
  base_url: http://localhost:8080
pipeline:
  planning: lines
  max_queries: 3
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.provider, "searxng");
        assert_eq!(settings.pipeline.planning, PlanningMode::Lines);
        assert_eq!(settings.pipeline.max_queries, 3);
        assert_eq!(settings.llm.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("WEBSYNTH_PORT", "9999"),
            ("TAVILY_API_KEY", "tvly-secret"),
            ("PERPLEXITY_API_KEY", "pplx-secret"),
            ("OLLAMA_HOST", "http://gpu-box:11434"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.merge_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.server.port, 9999);
        assert_eq!(settings.search.api_key.as_deref(), Some("tvly-secret"));
        assert_eq!(settings.llm.base_url, "http://gpu-box:11434");
    }

    #[test]
    fn test_validate() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.search.base_url = Some("not a url".to_string());
        assert!(settings.validate().is_err());

        settings.search.base_url = None;
        settings.pipeline.max_queries = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_pipeline_limits() {
        let yaml = r#"
pipeline:
  max_queries: 12
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.validate().is_err());

        let yaml = r#"
pipeline:
  no_information_message: "  "
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pipeline.max_queries = MAX_PLANNED_QUERIES;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let yaml = r#"
search:
  provider: Tavily
"#;
        let mut settings: Settings = serde_yaml::from_str(yaml).unwrap();
        settings.merge_from(|key| (key == "TAVILY_API_KEY").then(|| "tvly".to_string()));

        assert_eq!(settings.search.provider, "tavily");
        assert_eq!(settings.search.api_key.as_deref(), Some("tvly"));

        let mut settings = Settings::default();
        settings.merge_from(|key| match key {
            "WEBSYNTH_SEARCH_PROVIDER" => Some(" SearXNG ".to_string()),
            "SEARXNG_URL" => Some("http://searx.local".to_string()),
            _ => None,
        });
        assert_eq!(settings.search.provider, "searxng");
        assert_eq!(settings.search.base_url.as_deref(), Some("http://searx.local"));
    }
}
