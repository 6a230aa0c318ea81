//! Benchmark error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::models::ResourceKind;
use crate::orchestrator::PollPhase;

/// Why an external command did not succeed.
#[derive(Debug, Error)]
pub enum ExecFailure {
    #[error("failed to start: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("exit status {0}")]
    Status(i32),

    #[error("terminated by signal")]
    Signal,
}

/// Failure of a single external command invocation.
#[derive(Debug, Error)]
#[error("{program} {first_arg}: {cause}: {output}")]
pub struct ExecError {
    pub program: String,
    /// First argument, kept for context (usually the subcommand).
    pub first_arg: String,
    pub cause: ExecFailure,
    /// Combined stdout and stderr captured before the failure.
    pub output: String,
}

/// Step of a trigger mutation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStage {
    Read,
    Write,
    Stage,
    Commit,
    Push,
}

impl std::fmt::Display for MutationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MutationStage::Read => "read",
            MutationStage::Write => "write",
            MutationStage::Stage => "add",
            MutationStage::Commit => "commit",
            MutationStage::Push => "push",
        };
        f.write_str(name)
    }
}

/// Errors that abort a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to create working directory {path}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to sync {remote} into {path}")]
    Sync {
        remote: String,
        path: PathBuf,
        #[source]
        source: ExecError,
    },

    #[error("failed to parse the trigger file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("failed to update the trigger file {path} ({stage})")]
    Mutation {
        path: PathBuf,
        stage: MutationStage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to list {kind} in namespace {namespace}")]
    Query {
        kind: ResourceKind,
        namespace: String,
        #[source]
        source: ExecError,
    },

    #[error("failed to decode the list of {kind} in namespace {namespace}")]
    Decode {
        kind: ResourceKind,
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("deadline of {deadline:?} exceeded while {phase}")]
    DeadlineExceeded { phase: PollPhase, deadline: Duration },
}

pub type BenchResult<T> = Result<T, BenchError>;
