//! Question-to-answer pipeline
//!
//! Three stages run strictly in order over a shared [`PipelineState`]:
//! query planning, per-query search and summarization, and the final
//! cited answer. Every stage absorbs its collaborators' failures, so a
//! run always ends with answer text.

mod controller;
mod planner;
pub mod prompts;
mod search_loop;
mod state;
mod synthesizer;

pub use controller::{Pipeline, StageEvent};
pub use planner::{parse_query_lines, template_queries, Planner, PlanningStrategy};
pub use search_loop::{successful_results, SearchLoop};
pub use state::*;
pub use synthesizer::{render_references, render_sources, Synthesizer};

/// Answer used when no query produced a usable source
pub const NO_INFORMATION_MESSAGE: &str = "Could not find relevant information for your question.";

/// Answer used for an empty or whitespace-only question
pub const EMPTY_QUESTION_MESSAGE: &str = "Please provide a question.";
