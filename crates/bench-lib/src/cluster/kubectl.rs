//! kubectl-backed [`ClusterStateReader`]

use super::ClusterStateReader;
use crate::error::{BenchError, BenchResult};
use crate::exec::{CommandRunner, ProcessExecutor};
use crate::models::{ResourceDescriptor, ResourceKind, ResourceList};
use async_trait::async_trait;
use tracing::debug;

/// Decode a `kubectl get -o json` list envelope.
///
/// A missing or null `items` is an empty listing; anything that is not a
/// JSON object of that shape is an error.
pub fn decode_listing(raw: &str) -> Result<Vec<ResourceDescriptor>, serde_json::Error> {
    let list: ResourceList = serde_json::from_str(raw)?;
    Ok(list.into_items())
}

/// Lists resources by shelling out to `kubectl`
pub struct KubectlReader<R = ProcessExecutor> {
    runner: R,
    program: String,
}

impl KubectlReader<ProcessExecutor> {
    /// Create a reader that runs the `kubectl` found on PATH
    pub fn new() -> Self {
        Self::with_runner(ProcessExecutor::new(), "kubectl")
    }
}

impl Default for KubectlReader<ProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> KubectlReader<R> {
    pub fn with_runner(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

#[async_trait]
impl<R: CommandRunner> ClusterStateReader for KubectlReader<R> {
    async fn list(
        &self,
        kind: ResourceKind,
        namespace: &str,
    ) -> BenchResult<Vec<ResourceDescriptor>> {
        let raw = self
            .runner
            .run(
                &self.program,
                &["get", kind.as_str(), "-n", namespace, "-o", "json"],
                None,
            )
            .await
            .map_err(|source| BenchError::Query {
                kind,
                namespace: namespace.to_string(),
                source,
            })?;

        let items = decode_listing(&raw).map_err(|source| BenchError::Decode {
            kind,
            namespace: namespace.to_string(),
            source,
        })?;

        debug!(kind = %kind, namespace = %namespace, count = items.len(), "Listed resources");
        Ok(items)
    }
}
