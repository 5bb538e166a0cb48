//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::pipeline::Pipeline;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Question-to-answer pipeline
    pub pipeline: Arc<Pipeline>,
    /// Run counters
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(settings: Settings, pipeline: Pipeline) -> Self {
        Self {
            settings: Arc::new(settings),
            pipeline: Arc::new(pipeline),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    /// Upper bound on a single pipeline run
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.server.run_timeout)
    }

    pub fn metrics_enabled(&self) -> bool {
        self.settings.general.enable_metrics
    }
}
