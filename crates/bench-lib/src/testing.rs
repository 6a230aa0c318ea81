//! Scripted command runner shared by unit tests

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ExecError, ExecFailure};
use crate::exec::CommandRunner;

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl Call {
    pub fn args(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

enum Reply {
    Ok(String),
    Fail(i32, String),
}

/// Replays queued replies in order; answers `Ok("")` once the queue is empty
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, output: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ok(output.to_string()));
        self
    }

    pub fn fail(self, code: i32, output: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(code, output.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        current_dir: Option<&Path>,
    ) -> Result<String, ExecError> {
        self.calls.lock().unwrap().push(Call {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            current_dir: current_dir.map(Path::to_path_buf),
        });

        match self.replies.lock().unwrap().pop_front() {
            None => Ok(String::new()),
            Some(Reply::Ok(output)) => Ok(output),
            Some(Reply::Fail(code, output)) => Err(ExecError {
                program: program.to_string(),
                first_arg: args.first().map(|a| a.to_string()).unwrap_or_default(),
                cause: ExecFailure::Status(code),
                output,
            }),
        }
    }
}
