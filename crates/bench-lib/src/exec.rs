//! External command execution
//!
//! Every interaction with git and the cluster goes through a [`CommandRunner`],
//! so tests can swap the real process executor for a scripted one.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ExecError, ExecFailure};

/// Runs a program to completion and returns its combined output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, optionally inside `current_dir`.
    ///
    /// Fails when the program cannot be started or exits non-zero. The
    /// returned text (and `ExecError::output`) is all of stdout followed by
    /// all of stderr; writes to the two streams are not interleaved.
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        current_dir: Option<&Path>,
    ) -> Result<String, ExecError>;
}

/// [`CommandRunner`] backed by real child processes.
///
/// No timeout and no retries; callers decide both.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        current_dir: Option<&Path>,
    ) -> Result<String, ExecError> {
        let first_arg = args.first().map(|a| a.to_string()).unwrap_or_default();

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        if let Some(dir) = current_dir {
            command.current_dir(dir);
        }

        debug!(program = %program, args = ?args, "Running command");

        let output = match command.output().await {
            Ok(output) => output,
            Err(e) => {
                return Err(ExecError {
                    program: program.to_string(),
                    first_arg,
                    cause: ExecFailure::Spawn(e),
                    output: String::new(),
                })
            }
        };

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        let text = String::from_utf8_lossy(&combined).into_owned();

        if output.status.success() {
            return Ok(text);
        }

        let cause = match output.status.code() {
            Some(code) => ExecFailure::Status(code),
            None => ExecFailure::Signal,
        };

        Err(ExecError {
            program: program.to_string(),
            first_arg,
            cause,
            output: text,
        })
    }
}
