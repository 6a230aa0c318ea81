//! Core data models for the benchmark

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};

pub const DEFAULT_TRIGGER_FILE: &str = "trigger.txt";
pub const DEFAULT_CONTROLLER_NAMESPACE: &str = "arc-systems";
pub const DEFAULT_RUNNER_NAMESPACE: &str = "arc-runners";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Benchmark configuration, fixed for the lifetime of a run
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Source repository to clone, e.g. git@github.com:example/repo.git
    pub source_repo: String,
    /// Working directory for the clone; a timestamped temp dir when unset
    pub work_dir: Option<PathBuf>,
    /// File inside the repository that is rewritten to trigger the workflow.
    /// Nothing else should touch it while a benchmark is running.
    pub trigger_file: PathBuf,
    /// Number of times the trigger file is updated (one workflow job each)
    pub triggers: u32,
    /// Namespace the controller runs in
    pub controller_namespace: String,
    /// Namespace ephemeral runners are created in
    pub runner_namespace: String,
    /// Sleep between drain polls
    pub poll_interval: Duration,
    /// Give up polling once this much time has passed since the first trigger
    pub deadline: Option<Duration>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            source_repo: String::new(),
            work_dir: None,
            trigger_file: PathBuf::from(DEFAULT_TRIGGER_FILE),
            triggers: 1,
            controller_namespace: DEFAULT_CONTROLLER_NAMESPACE.to_string(),
            runner_namespace: DEFAULT_RUNNER_NAMESPACE.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn new(source_repo: impl Into<String>) -> Self {
        Self {
            source_repo: source_repo.into(),
            ..Self::default()
        }
    }

    /// Reject configurations the run cannot start with
    pub fn validate(&self) -> BenchResult<()> {
        if self.source_repo.trim().is_empty() {
            return Err(BenchError::Config("source repository is required".into()));
        }
        if self.triggers == 0 {
            return Err(BenchError::Config("triggers must be at least 1".into()));
        }
        if self.trigger_file.as_os_str().is_empty() {
            return Err(BenchError::Config("trigger file must not be empty".into()));
        }
        if self.trigger_file.is_absolute() {
            return Err(BenchError::Config(format!(
                "trigger file {} must be relative to the repository",
                self.trigger_file.display()
            )));
        }
        Ok(())
    }
}

/// Resource kinds observed in the runner namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    EphemeralRunner,
    Pod,
}

impl ResourceKind {
    /// Name as passed to `kubectl get`
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::EphemeralRunner => "ephemeralrunner",
            ResourceKind::Pod => "pod",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

/// Lightweight view of a listed resource; every other field is ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub metadata: ObjectMeta,
}

impl ResourceDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta { name: name.into() },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// `kubectl get -o json` list envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub items: Option<Vec<ResourceDescriptor>>,
}

impl ResourceList {
    pub fn into_items(self) -> Vec<ResourceDescriptor> {
        self.items.unwrap_or_default()
    }
}

/// Counts seen in one poll iteration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    pub ephemeral_runners: usize,
    pub pods: usize,
}

impl Observation {
    /// At least one of the two listings is non-empty
    pub fn any_present(&self) -> bool {
        self.ephemeral_runners > 0 || self.pods > 0
    }

    /// Both listings are empty in this same iteration
    pub fn drained(&self) -> bool {
        self.ephemeral_runners == 0 && self.pods == 0
    }
}

/// Start/end of the measured interval
#[derive(Debug, Clone, Copy)]
pub struct MeasurementWindow {
    started_at: DateTime<Utc>,
    started: tokio::time::Instant,
}

impl MeasurementWindow {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: tokio::time::Instant::now(),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Close the window, returning the end timestamp and the elapsed time
    pub fn finish(self) -> (DateTime<Utc>, Duration) {
        let elapsed = self.started.elapsed();
        (Utc::now(), elapsed)
    }
}

/// Result of a completed benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub source_repo: String,
    pub work_dir: PathBuf,
    pub trigger_file: PathBuf,
    pub triggers: u32,
    pub controller_namespace: String,
    pub runner_namespace: String,
    /// Counter value left in the trigger file by the last mutation
    pub final_trigger_value: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub rise_polls: u32,
    pub fall_polls: u32,
}

impl BenchmarkReport {
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}
