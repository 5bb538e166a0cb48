//! Pipeline state threaded through the three stages

use crate::search::SourceRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Condensed output of one successful query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub title: String,
    pub url: String,
    /// Summary of the source with respect to the question
    pub resume: String,
}

impl QueryResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>, resume: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            resume: resume.into(),
        }
    }

    /// Attribute a summary to the record it was made from
    pub fn from_source(source: &SourceRecord, resume: impl Into<String>) -> Self {
        Self::new(source.title.clone(), source.url.clone(), resume)
    }
}

/// Why a planned query contributed nothing
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("no search results")]
    NoResults,

    #[error("search failed: {0}")]
    Search(String),

    #[error("summarization failed: {0}")]
    Summarize(String),
}

/// Outcome of one planned query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub query: String,
    #[serde(with = "outcome_serde")]
    pub outcome: Result<QueryResult, SkipReason>,
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

mod outcome_serde {
    use super::{QueryResult, SkipReason};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum Repr {
        Ok(QueryResult),
        Skipped(SkipReason),
    }

    pub fn serialize<S: Serializer>(
        value: &Result<QueryResult, SkipReason>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Ok(r) => Repr::Ok(r.clone()).serialize(serializer),
            Err(e) => Repr::Skipped(e.clone()).serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Result<QueryResult, SkipReason>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Ok(r) => Ok(r),
            Repr::Skipped(e) => Err(e),
        })
    }
}

/// Pipeline stage identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    BuildQueries,
    SerialSearch,
    FinalWriter,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuildQueries => "build_queries",
            Self::SerialSearch => "serial_search",
            Self::FinalWriter => "final_writer",
        }
    }

    /// Stage that runs after this one
    pub fn next(&self) -> Option<Stage> {
        match self {
            Self::BuildQueries => Some(Self::SerialSearch),
            Self::SerialSearch => Some(Self::FinalWriter),
            Self::FinalWriter => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial state produced by one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageUpdate {
    Queries(Vec<String>),
    QueryResults {
        results: Vec<QueryResult>,
        outcomes: Vec<QueryOutcome>,
    },
    FinalResponse(String),
}

impl StageUpdate {
    /// Stage allowed to emit this update
    pub fn stage(&self) -> Stage {
        match self {
            Self::Queries(_) => Stage::BuildQueries,
            Self::QueryResults { .. } => Stage::SerialSearch,
            Self::FinalResponse(_) => Stage::FinalWriter,
        }
    }
}

/// State for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    pub user_input: String,
    pub queries: Vec<String>,
    pub queries_results: Vec<QueryResult>,
    /// Per-query outcomes of the search loop, skips included
    pub outcomes: Vec<QueryOutcome>,
    pub final_response: String,
}

impl PipelineState {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            ..Default::default()
        }
    }

    /// Merge a stage update; only the fields owned by that stage change
    pub fn apply(&mut self, update: StageUpdate) {
        match update {
            StageUpdate::Queries(queries) => self.queries = queries,
            StageUpdate::QueryResults { results, outcomes } => {
                self.queries_results = results;
                self.outcomes = outcomes;
            }
            StageUpdate::FinalResponse(text) => self.final_response = text,
        }
    }

    /// Number of planned queries that contributed nothing
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_is_additive() {
        let mut state = PipelineState::new("q");
        state.apply(StageUpdate::Queries(vec!["a".into(), "b".into()]));
        state.apply(StageUpdate::QueryResults {
            results: vec![QueryResult::new("T", "https://t.example", "r")],
            outcomes: vec![],
        });

        assert_eq!(state.user_input, "q");
        assert_eq!(state.queries, vec!["a", "b"]);
        assert_eq!(state.queries_results.len(), 1);
        assert!(state.final_response.is_empty());

        state.apply(StageUpdate::FinalResponse("done".into()));
        assert_eq!(state.queries, vec!["a", "b"]);
        assert_eq!(state.final_response, "done");
    }

    #[test]
    fn test_update_ownership() {
        assert_eq!(StageUpdate::Queries(vec![]).stage(), Stage::BuildQueries);
        assert_eq!(StageUpdate::FinalResponse(String::new()).stage(), Stage::FinalWriter);
        assert_eq!(Stage::BuildQueries.next(), Some(Stage::SerialSearch));
        assert_eq!(Stage::FinalWriter.next(), None);
    }

    #[test]
    fn test_outcome_json() {
        let skipped = QueryOutcome {
            query: "x".into(),
            outcome: Err(SkipReason::Search("timeout".into())),
        };
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["outcome"]["skipped"]["kind"], "search");
        assert_eq!(json["outcome"]["skipped"]["detail"], "timeout");

        let back: QueryOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, skipped);
    }
}
