//! Structured logging for benchmark runs
//!
//! Every phase transition is logged once with an `event` field, so a JSON
//! log stream can be reduced to a timeline of the run.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::models::Observation;

/// Structured logger for benchmark events
#[derive(Clone)]
pub struct BenchLogger {
    runner_namespace: String,
}

impl BenchLogger {
    pub fn new(runner_namespace: impl Into<String>) -> Self {
        Self {
            runner_namespace: runner_namespace.into(),
        }
    }

    pub fn log_started(&self, source_repo: &str, controller_namespace: &str, triggers: u32) {
        info!(
            event = "benchmark_started",
            source_repo = %source_repo,
            controller_namespace = %controller_namespace,
            runner_namespace = %self.runner_namespace,
            triggers = triggers,
            "Benchmark started"
        );
    }

    pub fn log_synced(&self, source_repo: &str, work_dir: &Path) {
        info!(
            event = "repository_synced",
            source_repo = %source_repo,
            work_dir = %work_dir.display(),
            "Source repository is up to date"
        );
    }

    pub fn log_trigger(&self, trigger_file: &Path, iteration: u32, triggers: u32, value: u64) {
        info!(
            event = "trigger_committed",
            trigger_file = %trigger_file.display(),
            iteration = iteration,
            triggers = triggers,
            value = value,
            "Updated the trigger file"
        );
    }

    /// Rise-edge poll that saw nothing yet
    pub fn log_waiting_for_start(&self, poll: u32) {
        info!(
            namespace = %self.runner_namespace,
            poll = poll,
            "Waiting for the creation of the ephemeral runners..."
        );
    }

    pub fn log_workload_started(&self, observed: Observation, polls: u32) {
        info!(
            event = "workload_started",
            namespace = %self.runner_namespace,
            ephemeral_runners = observed.ephemeral_runners,
            pods = observed.pods,
            polls = polls,
            "Ephemeral runners created"
        );
    }

    /// Fall-edge poll that still sees runners or pods
    pub fn log_drain_observation(&self, observed: Observation, poll: u32) {
        info!(
            event = "drain_observation",
            namespace = %self.runner_namespace,
            ephemeral_runners = observed.ephemeral_runners,
            pods = observed.pods,
            poll = poll,
            "Observed {} ephemeral runners and {} pods, still waiting for the completion of the workflow runs...",
            observed.ephemeral_runners,
            observed.pods
        );
    }

    pub fn log_workload_drained(&self, polls: u32) {
        info!(
            event = "workload_drained",
            namespace = %self.runner_namespace,
            polls = polls,
            "All ephemeral runners and pods are gone"
        );
    }

    pub fn log_completed(&self, elapsed: Duration) {
        info!(
            event = "benchmark_completed",
            elapsed_secs = elapsed.as_secs_f64(),
            "Elapsed time: {:?}",
            elapsed
        );
    }
}
