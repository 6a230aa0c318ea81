//! Cluster state queries
//!
//! Read-only listings of the resources actions-runner-controller creates
//! for workflow jobs. Every call is an independent snapshot.

mod kubectl;

pub use kubectl::{decode_listing, KubectlReader};

use crate::error::BenchResult;
use crate::models::{ResourceDescriptor, ResourceKind};
use async_trait::async_trait;

/// Trait for cluster state backends
#[async_trait]
pub trait ClusterStateReader: Send + Sync {
    /// List every resource of `kind` in `namespace`
    async fn list(&self, kind: ResourceKind, namespace: &str)
        -> BenchResult<Vec<ResourceDescriptor>>;
}
