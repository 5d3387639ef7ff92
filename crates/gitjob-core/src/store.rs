//! Job store trait.
//!
//! The store is where Job records live (the Kubernetes API in production).

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;

use crate::{LabelSelector, Result};

/// Trait for listing and creating Job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Name of this store.
    fn name(&self) -> &'static str;

    /// List the Jobs in `namespace` matching `selector`.
    ///
    /// Implementations return [`crate::Error::NotFound`] when the API reports
    /// that the collection itself does not exist.
    async fn list(&self, namespace: &str, selector: &LabelSelector) -> Result<Vec<Job>>;

    /// Create a Job, returning the record as stored.
    async fn create(&self, namespace: &str, job: Job) -> Result<Job>;
}
