//! Helpers for reading Job records.

use k8s_openapi::api::batch::v1::Job;

/// Returns true if the Job has neither succeeded nor failed yet.
pub fn is_job_active(job: &Job) -> bool {
    let status = job.status.as_ref();
    let succeeded = status.and_then(|s| s.succeeded).unwrap_or(0);
    let failed = status.and_then(|s| s.failed).unwrap_or(0);
    succeeded == 0 && failed == 0
}

pub fn job_name(job: &Job) -> &str {
    job.metadata.name.as_deref().unwrap_or_default()
}

pub fn job_label<'a>(job: &'a Job, key: &str) -> Option<&'a str> {
    job.metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(key))
        .map(String::as_str)
}
