//! Source repository access
//!
//! The benchmark drives the workflow controller through commits to a
//! dedicated trigger file. This module keeps a local clone of the source
//! repository in sync and pushes single-file mutations to it.

mod git;

pub use git::{commit_message, GitClient};

use crate::error::BenchResult;
use async_trait::async_trait;
use std::path::Path;

/// Trait for version-control backends
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Clone `remote` into `work_dir`, or pull if a clone is already there
    async fn ensure_synced(&self, work_dir: &Path, remote: &str) -> BenchResult<()>;

    /// Overwrite `relative_path` with `content`, then commit and push exactly that file.
    ///
    /// A failed push leaves the local commit in place; nothing is rolled back.
    async fn commit_file_mutation(
        &self,
        work_dir: &Path,
        relative_path: &Path,
        content: &str,
    ) -> BenchResult<()>;
}
