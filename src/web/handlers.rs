//! HTTP request handlers

use super::state::AppState;
use crate::pipeline::PipelineState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Body of `POST /api/ask`
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Query parameters for the streaming endpoint
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    pub q: Option<String>,
}

/// Answer returned by `POST /api/ask`
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    pub queries: Vec<String>,
    pub sources: Vec<SourceRef>,
    pub answer: String,
    pub elapsed_ms: u64,
}

/// A cited source; `index` is its citation number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub index: usize,
    pub title: String,
    pub url: String,
}

impl AskResponse {
    fn from_state(state: PipelineState, elapsed: Duration) -> Self {
        let sources = state
            .queries_results
            .iter()
            .enumerate()
            .map(|(i, r)| SourceRef {
                index: i + 1,
                title: r.title.clone(),
                url: r.url.clone(),
            })
            .collect();

        Self {
            question: state.user_input,
            queries: state.queries,
            sources,
            answer: state.final_response,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Question handler
pub async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Response {
    let question = req.question.trim();
    if question.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "question must not be empty");
    }

    info!("Question: {}", question);
    let started = Instant::now();

    match tokio::time::timeout(state.run_timeout(), state.pipeline.run_state(question)).await {
        Ok(run) => {
            let elapsed = started.elapsed();
            if state.metrics_enabled() {
                state.metrics.record_run(&run, elapsed);
            }
            Json(AskResponse::from_state(run, elapsed)).into_response()
        }
        Err(_) => {
            warn!("Run timed out after {:?}", state.run_timeout());
            if state.metrics_enabled() {
                state.metrics.record_timeout();
            }
            error_response(StatusCode::GATEWAY_TIMEOUT, "pipeline run timed out")
        }
    }
}

/// Streaming question handler, one `stage` event per completed stage
pub async fn ask_stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Response {
    let question = match params.q {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => return error_response(StatusCode::BAD_REQUEST, "missing query parameter 'q'"),
    };

    info!("Streaming question: {}", question);

    let events = state
        .pipeline
        .clone()
        .stream(question)
        .take_until(tokio::time::sleep(state.run_timeout()))
        .map(|event| Event::default().event("stage").json_data(&event));

    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "instance_name": state.instance_name(),
        "version": crate::VERSION,
        "search_provider": state.settings.search.provider,
        "metrics": state.metrics.snapshot(),
    }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
