//! Query planner: turns a question into an ordered list of search queries

use super::prompts;
use crate::config::PlanningMode;
use crate::llm::LanguageModel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Leading bullet dashes, then leading numbering
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-\s]*[0-9.\s]*").expect("valid list marker regex"));

/// Queries kept by the line parser regardless of `max_queries`
const LINE_QUERY_LIMIT: usize = 3;

/// How model output is turned into queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanningStrategy {
    /// Schema-constrained `{"queries": [...]}` extraction
    Structured,
    /// Free text, one query per line
    Lines,
}

impl PlanningStrategy {
    /// Resolve the configured mode against what the model can do
    pub fn resolve(mode: PlanningMode, model: &dyn LanguageModel) -> Self {
        match mode {
            PlanningMode::Structured => Self::Structured,
            PlanningMode::Lines => Self::Lines,
            PlanningMode::Auto if model.supports_structured_output() => Self::Structured,
            PlanningMode::Auto => Self::Lines,
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryList {
    queries: Vec<String>,
}

fn query_list_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "queries": {
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "required": ["queries"]
    })
}

/// Plans search queries for a question
pub struct Planner {
    model: Arc<dyn LanguageModel>,
    strategy: PlanningStrategy,
    max_queries: usize,
    min_query_len: usize,
}

impl Planner {
    pub fn new(model: Arc<dyn LanguageModel>, strategy: PlanningStrategy) -> Self {
        Self {
            model,
            strategy,
            max_queries: 5,
            min_query_len: 3,
        }
    }

    /// Set the maximum number of queries
    pub fn with_max_queries(mut self, max: usize) -> Self {
        self.max_queries = max.max(1);
        self
    }

    /// Set the length a parsed line must exceed to count as a query
    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }

    pub fn strategy(&self) -> PlanningStrategy {
        self.strategy
    }

    /// Plan queries for `question`. Never fails: errors fall back to the
    /// question itself.
    pub async fn plan(&self, question: &str) -> Vec<String> {
        let queries = match self.strategy {
            PlanningStrategy::Structured => self.plan_structured(question).await,
            PlanningStrategy::Lines => self.plan_lines(question).await,
        };
        info!("Planned queries: {:?}", queries);
        queries
    }

    async fn plan_structured(&self, question: &str) -> Vec<String> {
        let prompt = prompts::build_queries(question);

        let extracted = match self.model.invoke_structured(&prompt, &query_list_schema()).await {
            Ok(value) => serde_json::from_value::<QueryList>(value).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match extracted {
            Ok(list) => {
                let queries = clean_queries(list.queries, self.max_queries);
                if queries.is_empty() {
                    warn!("Planner returned no queries, using the question");
                    vec![question.to_string()]
                } else {
                    queries
                }
            }
            Err(e) => {
                warn!("Failed to plan queries: {}", e);
                vec![question.to_string()]
            }
        }
    }

    async fn plan_lines(&self, question: &str) -> Vec<String> {
        let prompt = prompts::line_queries(question);

        let completion = match self.model.invoke(&prompt).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to plan queries: {}", e);
                return vec![question.to_string()];
            }
        };

        let limit = self.max_queries.min(LINE_QUERY_LIMIT);
        let queries = clean_queries(
            parse_query_lines(&completion.content, self.min_query_len),
            limit,
        );

        if queries.is_empty() {
            warn!("No usable query lines, using templated queries");
            template_queries(question)
        } else {
            queries
        }
    }
}

/// Strip list markers and keep lines longer than `min_len` characters
pub fn parse_query_lines(text: &str, min_len: usize) -> Vec<String> {
    text.trim()
        .lines()
        .map(|line| LIST_MARKER.replace(line.trim(), "").trim().to_string())
        .filter(|line| line.chars().count() > min_len)
        .collect()
}

/// Fixed-suffix queries used when the line parser finds nothing
pub fn template_queries(question: &str) -> Vec<String> {
    let base = question.trim().to_lowercase();
    vec![
        format!("{} explained", base),
        format!("what is {}", base),
        format!("how does {} work", base),
    ]
}

/// Trim, drop empties and duplicates (first wins), cap at `max`
fn clean_queries(raw: Vec<String>, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .filter(|q| seen.insert(q.clone()))
        .take(max)
        .collect()
}
