//! Benchmark library for actions-runner-controller
//!
//! This crate provides the core functionality for:
//! - Running external commands (git, kubectl)
//! - Syncing the source repository and committing trigger mutations
//! - Reading ephemeral runner and pod listings from the cluster
//! - Orchestrating the trigger-to-drain measurement

pub mod cluster;
pub mod error;
pub mod exec;
pub mod models;
pub mod observability;
pub mod orchestrator;
pub mod vcs;

#[cfg(test)]
mod testing;

pub use cluster::{ClusterStateReader, KubectlReader};
pub use error::{BenchError, BenchResult, ExecError, ExecFailure, MutationStage};
pub use exec::{CommandRunner, ProcessExecutor};
pub use models::*;
pub use observability::BenchLogger;
pub use orchestrator::{Benchmark, PollPhase};
pub use vcs::{GitClient, VersionControl};
