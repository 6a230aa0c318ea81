//! Rise-edge and fall-edge polling
//!
//! After the triggers are pushed the benchmark waits for the controller to
//! react (any ephemeral runner or pod appears), then waits for the work to
//! drain (no runner and no pod in the same poll).

use std::time::Duration;

use tracing::debug;

use crate::cluster::ClusterStateReader;
use crate::error::{BenchError, BenchResult};
use crate::models::{MeasurementWindow, Observation, ResourceKind};
use crate::observability::BenchLogger;

/// States of the post-trigger polling machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    AwaitingStart,
    Running,
    AwaitingDrain,
    Drained,
}

impl PollPhase {
    /// State after observing `observed` in this phase
    pub fn next(self, observed: Observation) -> PollPhase {
        match self {
            PollPhase::AwaitingStart if observed.any_present() => PollPhase::Running,
            PollPhase::Running => PollPhase::AwaitingDrain,
            PollPhase::AwaitingDrain if observed.drained() => PollPhase::Drained,
            phase => phase,
        }
    }
}

impl std::fmt::Display for PollPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PollPhase::AwaitingStart => "awaiting start",
            PollPhase::Running => "running",
            PollPhase::AwaitingDrain => "awaiting drain",
            PollPhase::Drained => "drained",
        };
        f.write_str(name)
    }
}

/// Poll counts per edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollCounts {
    pub rise: u32,
    pub fall: u32,
}

pub(crate) struct Poller<'a, C> {
    pub cluster: &'a C,
    pub namespace: &'a str,
    pub logger: &'a BenchLogger,
    pub window: &'a MeasurementWindow,
    pub deadline: Option<Duration>,
    pub interval: Duration,
}

impl<C: ClusterStateReader> Poller<'_, C> {
    /// Drive the machine from `AwaitingStart` to `Drained`
    pub async fn run(&self) -> BenchResult<PollCounts> {
        let mut phase = PollPhase::AwaitingStart;
        let mut counts = PollCounts::default();

        loop {
            match phase {
                PollPhase::AwaitingStart => {
                    self.check_deadline(phase)?;
                    counts.rise += 1;
                    let observed = self.observe().await?;
                    phase = phase.next(observed);
                    if phase == PollPhase::Running {
                        self.logger.log_workload_started(observed, counts.rise);
                    } else {
                        self.logger.log_waiting_for_start(counts.rise);
                    }
                }
                PollPhase::Running => {
                    phase = phase.next(Observation::default());
                }
                PollPhase::AwaitingDrain => {
                    self.check_deadline(phase)?;
                    counts.fall += 1;
                    let observed = self.observe().await?;
                    phase = phase.next(observed);
                    if phase == PollPhase::Drained {
                        self.logger.log_workload_drained(counts.fall);
                    } else {
                        self.logger.log_drain_observation(observed, counts.fall);
                        tokio::time::sleep(self.interval).await;
                    }
                }
                PollPhase::Drained => return Ok(counts),
            }
        }
    }

    /// One poll iteration: both listings, in order
    async fn observe(&self) -> BenchResult<Observation> {
        let ephemeral_runners = self
            .cluster
            .list(ResourceKind::EphemeralRunner, self.namespace)
            .await?;
        let pods = self.cluster.list(ResourceKind::Pod, self.namespace).await?;

        let observed = Observation {
            ephemeral_runners: ephemeral_runners.len(),
            pods: pods.len(),
        };
        debug!(
            ephemeral_runners = observed.ephemeral_runners,
            pods = observed.pods,
            "Polled runner namespace"
        );
        Ok(observed)
    }

    fn check_deadline(&self, phase: PollPhase) -> BenchResult<()> {
        match self.deadline {
            Some(deadline) if self.window.elapsed() >= deadline => {
                Err(BenchError::DeadlineExceeded { phase, deadline })
            }
            _ => Ok(()),
        }
    }
}
