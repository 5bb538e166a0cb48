//! Pipeline controller: planner, search loop and writer in a fixed order

use super::planner::{Planner, PlanningStrategy};
use super::search_loop::{successful_results, SearchLoop};
use super::state::{PipelineState, Stage, StageUpdate};
use super::synthesizer::Synthesizer;
use super::EMPTY_QUESTION_MESSAGE;
use crate::config::Settings;
use crate::llm::LanguageModel;
use crate::search::SearchProvider;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument, Span};
use uuid::Uuid;

/// Emitted when a stage completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvent {
    pub stage: Stage,
    pub update: StageUpdate,
}

/// The question-to-answer pipeline
pub struct Pipeline {
    planner: Planner,
    search_loop: SearchLoop,
    synthesizer: Synthesizer,
}

impl Pipeline {
    pub fn new(planner: Planner, search_loop: SearchLoop, synthesizer: Synthesizer) -> Self {
        Self {
            planner,
            search_loop,
            synthesizer,
        }
    }

    /// Wire the stages from settings. `model` plans and summarizes,
    /// `writer` produces the final answer.
    pub fn from_settings(
        settings: &Settings,
        provider: Arc<dyn SearchProvider>,
        model: Arc<dyn LanguageModel>,
        writer: Arc<dyn LanguageModel>,
    ) -> Self {
        let strategy = PlanningStrategy::resolve(settings.pipeline.planning, model.as_ref());
        let planner = Planner::new(model.clone(), strategy)
            .with_max_queries(settings.pipeline.max_queries)
            .with_min_query_len(settings.pipeline.min_query_len);
        info!("Planning strategy: {:?}", planner.strategy());

        let search_loop = SearchLoop::new(provider, model)
            .with_raw_content(settings.search.include_raw_content)
            .with_max_content_chars(settings.search.max_content_chars)
            .with_summarize(settings.pipeline.summarize);

        let synthesizer = Synthesizer::new(writer)
            .with_no_information_message(settings.pipeline.no_information_message.clone());

        Self::new(planner, search_loop, synthesizer)
    }

    /// Answer a question. Always returns text.
    pub async fn run(&self, question: &str) -> String {
        self.run_state(question).await.final_response
    }

    /// Run every stage and return the final state
    pub async fn run_state(&self, question: &str) -> PipelineState {
        let mut state = PipelineState::new(question);
        if question.trim().is_empty() {
            warn!("Empty question, skipping pipeline");
            state.final_response = EMPTY_QUESTION_MESSAGE.to_string();
            return state;
        }

        async move {
            info!("Starting pipeline");
            let mut next = Some(Stage::BuildQueries);
            while let Some(stage) = next {
                let update = self.step(stage, &state).await;
                state.apply(update);
                next = stage.next();
            }
            info!(
                "Pipeline finished: {} queries, {} sources, {} skipped",
                state.queries.len(),
                state.queries_results.len(),
                state.skipped()
            );
            state
        }
        .instrument(run_span())
        .await
    }

    /// Run one stage against the current state
    pub async fn step(&self, stage: Stage, state: &PipelineState) -> StageUpdate {
        match stage {
            Stage::BuildQueries => StageUpdate::Queries(self.planner.plan(&state.user_input).await),
            Stage::SerialSearch => {
                let outcomes = self.search_loop.run(&state.user_input, &state.queries).await;
                StageUpdate::QueryResults {
                    results: successful_results(&outcomes),
                    outcomes,
                }
            }
            Stage::FinalWriter => StageUpdate::FinalResponse(
                self.synthesizer
                    .write(&state.user_input, &state.queries_results)
                    .await,
            ),
        }
    }

    /// Yield one event per completed stage; the last one carries the answer
    pub fn stream(self: Arc<Self>, question: impl Into<String>) -> BoxStream<'static, StageEvent> {
        let question = question.into();

        if question.trim().is_empty() {
            warn!("Empty question, skipping pipeline");
            return stream::iter([StageEvent {
                stage: Stage::FinalWriter,
                update: StageUpdate::FinalResponse(EMPTY_QUESTION_MESSAGE.to_string()),
            }])
            .boxed();
        }

        let cursor = Cursor {
            pipeline: self,
            next: Some(Stage::BuildQueries),
            state: PipelineState::new(question),
            span: run_span(),
        };

        stream::unfold(cursor, |mut cursor| async move {
            let stage = cursor.next?;
            let update = cursor
                .pipeline
                .step(stage, &cursor.state)
                .instrument(cursor.span.clone())
                .await;
            cursor.state.apply(update.clone());
            cursor.next = stage.next();
            Some((StageEvent { stage, update }, cursor))
        })
        .boxed()
    }
}

struct Cursor {
    pipeline: Arc<Pipeline>,
    next: Option<Stage>,
    state: PipelineState,
    span: Span,
}

fn run_span() -> Span {
    info_span!("run", id = %Uuid::new_v4())
}
