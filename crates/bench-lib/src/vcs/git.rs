//! git-backed [`VersionControl`]

use super::VersionControl;
use crate::error::{BenchError, BenchResult, ExecError, MutationStage};
use crate::exec::{CommandRunner, ProcessExecutor};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

/// Commit message used for every trigger mutation
pub fn commit_message(relative_path: &Path) -> String {
    format!("Update {}", relative_path.display())
}

/// Drives the `git` binary through a [`CommandRunner`]
pub struct GitClient<R = ProcessExecutor> {
    runner: R,
    program: String,
}

impl GitClient<ProcessExecutor> {
    /// Create a client that runs the `git` found on PATH
    pub fn new() -> Self {
        Self::with_runner(ProcessExecutor::new(), "git")
    }
}

impl Default for GitClient<ProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> GitClient<R> {
    pub fn with_runner(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn git_in(
        &self,
        work_dir: &Path,
        args: &[&str],
        stage: MutationStage,
        file: &Path,
    ) -> BenchResult<()> {
        self.runner
            .run(&self.program, args, Some(work_dir))
            .await
            .map(|_| ())
            .map_err(|e| BenchError::Mutation {
                path: file.to_path_buf(),
                stage,
                source: Box::new(e),
            })
    }
}

#[async_trait]
impl<R: CommandRunner> VersionControl for GitClient<R> {
    async fn ensure_synced(&self, work_dir: &Path, remote: &str) -> BenchResult<()> {
        let sync_error = |source: ExecError| BenchError::Sync {
            remote: remote.to_string(),
            path: work_dir.to_path_buf(),
            source,
        };

        if tokio::fs::metadata(work_dir.join(".git")).await.is_ok() {
            info!(repo = %remote, path = %work_dir.display(), "Pulling latest changes");
            self.runner
                .run(&self.program, &["pull"], Some(work_dir))
                .await
                .map_err(sync_error)?;
        } else {
            info!(repo = %remote, path = %work_dir.display(), "Cloning source repository");
            let dir = work_dir.to_string_lossy();
            self.runner
                .run(&self.program, &["clone", remote, &dir], None)
                .await
                .map_err(sync_error)?;
        }

        Ok(())
    }

    async fn commit_file_mutation(
        &self,
        work_dir: &Path,
        relative_path: &Path,
        content: &str,
    ) -> BenchResult<()> {
        let file = work_dir.join(relative_path);

        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BenchError::Mutation {
                    path: file.clone(),
                    stage: MutationStage::Write,
                    source: Box::new(e),
                })?;
        }
        tokio::fs::write(&file, content)
            .await
            .map_err(|e| BenchError::Mutation {
                path: file.clone(),
                stage: MutationStage::Write,
                source: Box::new(e),
            })?;

        let relative = relative_path.to_string_lossy();
        let message = commit_message(relative_path);

        self.git_in(work_dir, &["add", &relative], MutationStage::Stage, &file)
            .await?;
        self.git_in(
            work_dir,
            &["commit", "-m", &message],
            MutationStage::Commit,
            &file,
        )
        .await?;
        self.git_in(work_dir, &["push"], MutationStage::Push, &file)
            .await?;

        debug!(file = %file.display(), content = %content, "Pushed trigger mutation");
        Ok(())
    }
}
