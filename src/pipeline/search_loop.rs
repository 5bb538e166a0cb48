//! Sequential retrieval and summarization over the planned queries

use super::prompts;
use super::state::{QueryOutcome, QueryResult, SkipReason};
use crate::llm::LanguageModel;
use crate::search::{truncate_content, SearchProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The loop only ever looks at the top-ranked hit
const RESULTS_PER_QUERY: usize = 1;

/// Runs one search and one summarization per query, strictly in order
pub struct SearchLoop {
    provider: Arc<dyn SearchProvider>,
    summarizer: Arc<dyn LanguageModel>,
    include_raw_content: bool,
    max_content_chars: Option<usize>,
    summarize: bool,
}

impl SearchLoop {
    pub fn new(provider: Arc<dyn SearchProvider>, summarizer: Arc<dyn LanguageModel>) -> Self {
        Self {
            provider,
            summarizer,
            include_raw_content: true,
            max_content_chars: None,
            summarize: true,
        }
    }

    /// Ask the provider for long-form page content
    pub fn with_raw_content(mut self, include: bool) -> Self {
        self.include_raw_content = include;
        self
    }

    /// Cut selected content before it reaches the summarizer
    pub fn with_max_content_chars(mut self, max: Option<usize>) -> Self {
        self.max_content_chars = max;
        self
    }

    /// When disabled the selected content is kept verbatim as the resume
    pub fn with_summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    /// Process every query in order; returns one outcome per query
    pub async fn run(&self, question: &str, queries: &[String]) -> Vec<QueryOutcome> {
        info!("Running search for {} queries", queries.len());

        let mut outcomes = Vec::with_capacity(queries.len());
        for (i, query) in queries.iter().enumerate() {
            debug!("Searching query {}: {}", i + 1, query);

            let outcome = self.process_query(question, query).await;
            match &outcome {
                Ok(result) => debug!("Processed result: {}", result.title),
                Err(reason) => warn!("Skipping query '{}': {}", query, reason),
            }
            outcomes.push(QueryOutcome {
                query: query.clone(),
                outcome,
            });
        }

        info!(
            "Collected {} of {} results",
            outcomes.iter().filter(|o| o.is_success()).count(),
            outcomes.len()
        );
        outcomes
    }

    async fn process_query(&self, question: &str, query: &str) -> Result<QueryResult, SkipReason> {
        let response = self
            .provider
            .search(query, RESULTS_PER_QUERY, self.include_raw_content)
            .await
            .map_err(|e| SkipReason::Search(e.to_string()))?;

        let source = response.first().ok_or(SkipReason::NoResults)?;

        let content = match self.max_content_chars {
            Some(max) => truncate_content(source.best_content(), max),
            None => source.best_content().to_string(),
        };

        if !self.summarize {
            return Ok(QueryResult::from_source(source, content));
        }

        let prompt = prompts::resume_search(question, &content);
        let summary = self
            .summarizer
            .invoke(&prompt)
            .await
            .map_err(|e| SkipReason::Summarize(e.to_string()))?;

        Ok(QueryResult::from_source(source, summary.content))
    }
}

/// Successful results in processing order
pub fn successful_results(outcomes: &[QueryOutcome]) -> Vec<QueryResult> {
    outcomes
        .iter()
        .filter_map(|o| o.outcome.as_ref().ok().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LlmError, SearchError};
    use crate::llm::{Completion, Result as LlmResult};
    use crate::search::{Result as SearchResult, SearchResponse, SourceRecord};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Hits keyed by query; unknown queries fail
    struct FakeSearch {
        hits: HashMap<String, Vec<SourceRecord>>,
        calls: Mutex<Vec<(String, usize, bool)>>,
    }

    #[async_trait]
    impl SearchProvider for FakeSearch {
        fn name(&self) -> &str {
            "fake"
        }

        async fn search(&self, query: &str, max_results: usize, raw: bool) -> SearchResult<SearchResponse> {
            self.calls.lock().unwrap().push((query.to_string(), max_results, raw));
            self.hits
                .get(query)
                .cloned()
                .map(SearchResponse::new)
                .ok_or_else(|| SearchError::InvalidResponse("connection reset".into()))
        }
    }

    /// Records prompts; fails when the prompt mentions "poison"
    struct EchoModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(&self, prompt: &str) -> LlmResult<Completion> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if prompt.contains("poison") {
                Err(LlmError::Status { status: 500, body: "boom".into() })
            } else {
                Ok(Completion::new("summary"))
            }
        }
    }

    fn fixture(hits: Vec<(&str, Vec<SourceRecord>)>) -> (Arc<FakeSearch>, Arc<EchoModel>) {
        let search = FakeSearch {
            hits: hits.into_iter().map(|(q, r)| (q.to_string(), r)).collect(),
            calls: Mutex::new(vec![]),
        };
        let model = EchoModel { prompts: Mutex::new(vec![]) };
        (Arc::new(search), Arc::new(model))
    }

    fn queries(qs: &[&str]) -> Vec<String> {
        qs.iter().map(|q| q.to_string()).collect()
    }

    #[tokio::test]
    async fn test_one_search_per_query_in_order() {
        let (search, model) = fixture(vec![
            ("q1", vec![SourceRecord::new("A", "https://a.example", "a").with_raw_content("full a")]),
            ("q2", vec![SourceRecord::new("B", "https://b.example", "b")]),
        ]);
        let search_loop = SearchLoop::new(search.clone(), model.clone());

        let outcomes = search_loop.run("question", &queries(&["q1", "q2"])).await;

        let calls = search.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("q1".to_string(), 1, true), ("q2".to_string(), 1, true)]);
        assert!(outcomes.iter().all(|o| o.is_success()));

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("full a"));
        assert!(prompts[1].contains("<SEARCH_RESULTS>\nb\n</SEARCH_RESULTS>"));

        let results = successful_results(&outcomes);
        assert_eq!(results[0], QueryResult::new("A", "https://a.example", "summary"));
        assert_eq!(results[1].title, "B");
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let (search, model) = fixture(vec![
            ("ok1", vec![SourceRecord::new("A", "https://a.example", "a")]),
            ("empty", vec![]),
            ("bad summary", vec![SourceRecord::new("P", "https://p.example", "poison")]),
            ("ok2", vec![SourceRecord::new("B", "https://b.example", "b")]),
        ]);
        let search_loop = SearchLoop::new(search, model);

        let outcomes = search_loop
            .run("question", &queries(&["ok1", "missing", "empty", "bad summary", "ok2"]))
            .await;

        assert_eq!(outcomes.len(), 5);
        assert!(matches!(outcomes[1].outcome, Err(SkipReason::Search(_))));
        assert_eq!(outcomes[2].outcome, Err(SkipReason::NoResults));
        assert!(matches!(outcomes[3].outcome, Err(SkipReason::Summarize(_))));

        let titles: Vec<_> = successful_results(&outcomes).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_without_summarization() {
        let (search, model) = fixture(vec![(
            "q",
            vec![SourceRecord::new("A", "https://a.example", "snippet").with_raw_content("abcdefghij")],
        )]);
        let search_loop = SearchLoop::new(search, model.clone())
            .with_summarize(false)
            .with_max_content_chars(Some(4));

        let outcomes = search_loop.run("question", &queries(&["q"])).await;

        let results = successful_results(&outcomes);
        assert_eq!(results[0].resume, "abcd... [truncated]");
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_queries() {
        let (search, model) = fixture(vec![]);
        let search_loop = SearchLoop::new(search, model);
        assert!(search_loop.run("question", &[]).await.is_empty());
    }
}
