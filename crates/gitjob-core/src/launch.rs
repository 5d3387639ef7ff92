//! Launcher trait and its request and outcome types.

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use serde::Serialize;
use std::path::PathBuf;

use crate::decision::SkipReason;
use crate::job::job_name;
use crate::{RepositoryRef, Result};

/// A detected commit to dispatch a Job for.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub repository: RepositoryRef,
    /// Commit identifier, usually a SHA.
    pub git_sha: String,
    /// Local checkout of the repository at `git_sha`.
    pub dir: PathBuf,
    /// Skip applying the `resources` directory next to the Job template.
    pub no_resource_apply: bool,
}

impl LaunchRequest {
    pub fn new(repository: RepositoryRef, git_sha: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            git_sha: git_sha.into(),
            dir: dir.into(),
            no_resource_apply: false,
        }
    }

    pub fn with_no_resource_apply(mut self, no_resource_apply: bool) -> Self {
        self.no_resource_apply = no_resource_apply;
        self
    }
}

/// Result of one dispatch cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LaunchOutcome {
    /// New Jobs were submitted.
    Created { jobs: Vec<Job> },
    /// Nothing was launched.
    Skipped { reason: SkipReason },
    /// The repository does not define a Job template.
    NotConfigured { repository: String, job_file: PathBuf },
}

impl LaunchOutcome {
    /// Jobs created by this cycle, empty unless [`LaunchOutcome::Created`].
    pub fn created(&self) -> &[Job] {
        match self {
            LaunchOutcome::Created { jobs } => jobs,
            _ => &[],
        }
    }

    pub fn created_names(&self) -> Vec<&str> {
        self.created().iter().map(job_name).collect()
    }
}

/// Trait for dispatching Jobs for detected commits.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Run one dispatch cycle for a commit.
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutcome>;
}
