//! Turning a Job template into a named, labeled Job.

use crate::labels::{
    COMMIT_SHA_LABEL, LabelSelector, MANAGED_BY_LABEL, MANAGED_BY_VALUE, REPOSITORY_LABEL,
};
use crate::naming::{LabelValue, trim_length};
use crate::repository::RepositoryRef;
use k8s_openapi::api::batch::v1::Job;

/// Longest repository prefix used in a Job name.
pub const MAX_NAME_PREFIX_LEN: usize = 20;

/// Budget shared by the repository prefix and the commit part of a Job name.
pub const NAME_BUDGET: usize = 30;

/// Build the Job name for a repository and commit.
///
/// The repository part is at most 20 characters and the commit part fills
/// the rest of a 30 character budget, so names are at most 31 characters
/// including the separator and always keep at least 10 characters of the sha.
pub fn resource_name(safe_name: &LabelValue, safe_sha: &LabelValue) -> String {
    let name_prefix = trim_length(safe_name.as_str(), MAX_NAME_PREFIX_LEN);
    let max_sha_len = NAME_BUDGET.saturating_sub(name_prefix.chars().count());
    format!(
        "{}-{}",
        name_prefix,
        trim_length(safe_sha.as_str(), max_sha_len)
    )
}

/// Name and label a template so it can be submitted for `commit_id`.
///
/// Every requirement of `base` is set as a label, so the Job is found again
/// by the selector it was dispatched under. The repository and commit labels
/// are always set; any other labels already on the template are left alone.
pub fn materialize(
    mut template: Job,
    base: &LabelSelector,
    repository: &RepositoryRef,
    commit_id: &str,
) -> Job {
    let safe_name = repository.safe_name();
    let safe_sha = LabelValue::new(commit_id);

    template.metadata.name = Some(resource_name(&safe_name, &safe_sha));

    let labels = template.metadata.labels.get_or_insert_with(Default::default);
    labels.insert(MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string());
    for (key, value) in base.iter() {
        labels.insert(key.to_string(), value.to_string());
    }
    labels.insert(REPOSITORY_LABEL.to_string(), safe_name.into());
    labels.insert(COMMIT_SHA_LABEL.to_string(), safe_sha.into());

    template
}
