//! Benchmark orchestration
//!
//! A benchmark is run in the following steps:
//!  1. Clone the source repository, or pull the latest changes if the
//!     working directory already holds a clone.
//!  2. Create or update the trigger file, commit it and push it. Each push
//!     makes the workflow run one job on an ephemeral runner.
//!  3. Repeat step 2 for the configured number of triggers.
//!  4. Wait for ephemeral runners or their pods to appear.
//!  5. Wait until no ephemeral runner and no pod is left.
//!
//! The elapsed time runs from the first trigger to the end of step 5.

mod poll;
mod trigger;


pub use poll::{PollCounts, PollPhase};
pub use trigger::{next_counter, parse_counter, read_counter};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cluster::{ClusterStateReader, KubectlReader};
use crate::error::{BenchError, BenchResult};
use crate::exec::ProcessExecutor;
use crate::models::{BenchmarkConfig, BenchmarkReport, MeasurementWindow};
use crate::observability::BenchLogger;
use crate::vcs::{GitClient, VersionControl};
use poll::Poller;

/// Default working directory: `<temp>/arcbench/<YYYYMMDDhhmmss>`
pub fn default_work_dir() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
    std::env::temp_dir().join("arcbench").join(timestamp)
}

/// A single benchmark run against one repository and one cluster
pub struct Benchmark<V = GitClient, C = KubectlReader> {
    config: BenchmarkConfig,
    vcs: V,
    cluster: C,
    logger: BenchLogger,
}

impl Benchmark {
    /// Benchmark using `git` and `kubectl` from PATH
    pub fn new(config: BenchmarkConfig) -> Self {
        Self::with_binaries(config, "git", "kubectl")
    }

    /// Benchmark using the given git and kubectl binaries
    pub fn with_binaries(config: BenchmarkConfig, git: &str, kubectl: &str) -> Self {
        Self::with_backends(
            config,
            GitClient::with_runner(ProcessExecutor::new(), git),
            KubectlReader::with_runner(ProcessExecutor::new(), kubectl),
        )
    }
}

impl<V: VersionControl, C: ClusterStateReader> Benchmark<V, C> {
    pub fn with_backends(config: BenchmarkConfig, vcs: V, cluster: C) -> Self {
        let logger = BenchLogger::new(&config.runner_namespace);
        Self {
            config,
            vcs,
            cluster,
            logger,
        }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    /// Run the benchmark to completion.
    ///
    /// Every error is fatal. Commits pushed before a failure stay pushed.
    pub async fn run(&self) -> BenchResult<BenchmarkReport> {
        let config = &self.config;
        config.validate()?;

        self.logger.log_started(
            &config.source_repo,
            &config.controller_namespace,
            config.triggers,
        );

        let work_dir = self.prepare_work_dir().await?;
        self.vcs
            .ensure_synced(&work_dir, &config.source_repo)
            .await?;
        self.logger.log_synced(&config.source_repo, &work_dir);

        let window = MeasurementWindow::start();

        // Sequential on purpose: each mutation builds on the previous push.
        let mut value = 0;
        for iteration in 1..=config.triggers {
            value = self.trigger(&work_dir).await?;
            self.logger
                .log_trigger(&config.trigger_file, iteration, config.triggers, value);
        }

        let counts = Poller {
            cluster: &self.cluster,
            namespace: &config.runner_namespace,
            logger: &self.logger,
            window: &window,
            deadline: config.deadline,
            interval: config.poll_interval,
        }
        .run()
        .await?;

        let started_at = window.started_at();
        let (finished_at, elapsed) = window.finish();
        self.logger.log_completed(elapsed);

        Ok(BenchmarkReport {
            source_repo: config.source_repo.clone(),
            work_dir,
            trigger_file: config.trigger_file.clone(),
            triggers: config.triggers,
            controller_namespace: config.controller_namespace.clone(),
            runner_namespace: config.runner_namespace.clone(),
            final_trigger_value: value,
            started_at,
            finished_at,
            elapsed_secs: elapsed.as_secs_f64(),
            rise_polls: counts.rise,
            fall_polls: counts.fall,
        })
    }

    async fn prepare_work_dir(&self) -> BenchResult<PathBuf> {
        let work_dir = self
            .config
            .work_dir
            .clone()
            .unwrap_or_else(default_work_dir);

        tokio::fs::create_dir_all(&work_dir)
            .await
            .map_err(|source| BenchError::Directory {
                path: work_dir.clone(),
                source,
            })?;

        debug!(path = %work_dir.display(), "Working directory ready");
        Ok(work_dir)
    }

    /// Bump the counter in the trigger file and push it; returns the new value
    async fn trigger(&self, work_dir: &Path) -> BenchResult<u64> {
        let trigger_file = &self.config.trigger_file;
        let path = work_dir.join(trigger_file);

        info!(trigger_file = %trigger_file.display(), "Create or update the trigger file");

        let current = read_counter(&path).await?;
        let next = next_counter(&path, current)?;

        self.vcs
            .commit_file_mutation(work_dir, trigger_file, &next.to_string())
            .await?;

        Ok(next)
    }
}
