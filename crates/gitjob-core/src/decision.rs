//! Dispatch decision engine.
//!
//! Given the Jobs that already exist for a repository, decide whether a new
//! Job should be launched for a commit. Two rules apply, in order:
//!
//! 1. If any Job is already labeled with the commit, skip. Re-running the
//!    decision for a commit that was dispatched is always a no-op.
//! 2. Otherwise, if any Job for the repository is still active, skip and let
//!    a later poll pick the commit up once it finishes.
//!
//! Listing and creating are separate API calls, so two concurrent triggers
//! for the same commit can both see `Proceed`. That window is accepted.

use crate::job::{is_job_active, job_label, job_name};
use crate::labels::COMMIT_SHA_LABEL;
use crate::naming::LabelValue;
use crate::repository::RepositoryRef;
use k8s_openapi::api::batch::v1::Job;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Why no Job was launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// One or more Jobs already exist for this commit.
    AlreadyDispatched { jobs: Vec<String> },
    /// Another Job for the repository has not finished.
    ActiveJob { job: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyDispatched { jobs } => write!(
                f,
                "already processed or in-flight for this commit ({})",
                jobs.join(", ")
            ),
            SkipReason::ActiveJob { job } => {
                write!(f, "another job still active for this repository ({})", job)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    Proceed,
}

/// Decide whether to launch a Job for `commit_id`.
///
/// `existing` must already be narrowed to the repository's Jobs.
pub fn decide(repository: &RepositoryRef, commit_id: &str, existing: &[Job]) -> Decision {
    let safe_name = repository.safe_name();
    let safe_sha = LabelValue::new(commit_id);

    let mut jobs_for_sha = Vec::new();
    let mut active_jobs = Vec::new();
    for job in existing {
        info!(job = %job_name(job), repository = %safe_name, "found Job");

        if job_label(job, COMMIT_SHA_LABEL) == Some(safe_sha.as_str()) {
            jobs_for_sha.push(job_name(job).to_string());
        }
        if is_job_active(job) {
            active_jobs.push(job_name(job).to_string());
        }
    }

    if !jobs_for_sha.is_empty() {
        return Decision::Skip(SkipReason::AlreadyDispatched { jobs: jobs_for_sha });
    }

    if let Some(active) = active_jobs.into_iter().next() {
        info!(
            repository = %safe_name,
            sha = %safe_sha,
            active_job = %active,
            "not creating a Job yet as there is an active job"
        );
        return Decision::Skip(SkipReason::ActiveJob { job: active });
    }

    Decision::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{MANAGED_BY_LABEL, MANAGED_BY_VALUE, REPOSITORY_LABEL};
    use k8s_openapi::api::batch::v1::JobStatus;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("demo-repo")
    }

    fn job(name: &str, sha: &str, succeeded: i32, failed: i32) -> Job {
        Job {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(BTreeMap::from([
                    (MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string()),
                    (REPOSITORY_LABEL.to_string(), "demo-repo".to_string()),
                    (COMMIT_SHA_LABEL.to_string(), sha.to_string()),
                ])),
                ..Default::default()
            },
            status: Some(JobStatus {
                succeeded: Some(succeeded),
                failed: Some(failed),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_dispatch_proceeds() {
        assert_eq!(decide(&repo(), "abc123", &[]), Decision::Proceed);
    }

    #[test]
    fn test_existing_job_for_commit_skips() {
        let existing = vec![job("demo-repo-abc123", "abc123", 1, 0)];
        assert_eq!(
            decide(&repo(), "abc123", &existing),
            Decision::Skip(SkipReason::AlreadyDispatched {
                jobs: vec!["demo-repo-abc123".to_string()]
            })
        );
    }

    #[test]
    fn test_idempotent_regardless_of_other_jobs() {
        let existing = vec![
            job("demo-repo-old1", "old1", 1, 0),
            job("demo-repo-other", "other", 0, 0),
            job("demo-repo-abc123", "abc123", 0, 0),
            job("demo-repo-old2", "old2", 0, 3),
        ];
        for _ in 0..3 {
            let decision = decide(&repo(), "abc123", &existing);
            assert!(matches!(
                decision,
                Decision::Skip(SkipReason::AlreadyDispatched { .. })
            ));
        }
    }

    #[test]
    fn test_commit_match_checked_before_active() {
        // the commit's own Job is active; it is reported as already dispatched
        let existing = vec![job("demo-repo-abc123", "abc123", 0, 0)];
        assert!(matches!(
            decide(&repo(), "abc123", &existing),
            Decision::Skip(SkipReason::AlreadyDispatched { .. })
        ));
    }

    #[test]
    fn test_active_job_for_other_commit_blocks() {
        let existing = vec![job("demo-repo-def456", "def456", 0, 0)];
        assert_eq!(
            decide(&repo(), "abc123", &existing),
            Decision::Skip(SkipReason::ActiveJob {
                job: "demo-repo-def456".to_string()
            })
        );
    }

    #[test]
    fn test_first_active_job_reported() {
        let existing = vec![
            job("demo-repo-done", "done", 1, 0),
            job("demo-repo-first", "first", 0, 0),
            job("demo-repo-second", "second", 0, 0),
        ];
        assert_eq!(
            decide(&repo(), "abc123", &existing),
            Decision::Skip(SkipReason::ActiveJob {
                job: "demo-repo-first".to_string()
            })
        );
    }

    #[test]
    fn test_finished_jobs_do_not_block() {
        let succeeded = vec![job("demo-repo-def456", "def456", 1, 0)];
        assert_eq!(decide(&repo(), "abc123", &succeeded), Decision::Proceed);

        let failed = vec![job("demo-repo-def456", "def456", 0, 1)];
        assert_eq!(decide(&repo(), "abc123", &failed), Decision::Proceed);
    }

    #[test]
    fn test_commit_compared_after_normalization() {
        let existing = vec![job("demo-repo-abc123", "abc123", 1, 0)];
        assert!(matches!(
            decide(&repo(), "ABC123", &existing),
            Decision::Skip(SkipReason::AlreadyDispatched { .. })
        ));
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::ActiveJob {
            job: "demo-repo-def456".to_string(),
        };
        assert_eq!(
            reason.to_string(),
            "another job still active for this repository (demo-repo-def456)"
        );
    }
}
