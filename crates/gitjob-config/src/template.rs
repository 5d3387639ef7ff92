//! Job template discovery and parsing.
//!
//! A repository opts in by committing a `job.yaml` under one of two folders:
//!
//! - `versionStream/git-operator/` (preferred when the folder exists)
//! - `.jx/git-operator/`
//!
//! A `resources/` directory next to `job.yaml` holds extra manifests that are
//! applied before the Job is created.

use k8s_openapi::api::batch::v1::Job;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{ConfigError, ConfigResult};

pub const VERSION_STREAM_FOLDER: &[&str] = &["versionStream", "git-operator"];
pub const DEFAULT_FOLDER: &[&str] = &[".jx", "git-operator"];
pub const JOB_FILE_NAME: &str = "job.yaml";
pub const RESOURCES_DIR_NAME: &str = "resources";

/// Where a repository's Job template lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLocation {
    /// Folder holding `job.yaml` and the optional `resources` directory.
    pub folder: PathBuf,
    /// Path of the `job.yaml` file. It may not exist.
    pub job_file: PathBuf,
}

impl TemplateLocation {
    pub fn resources_dir(&self) -> PathBuf {
        self.folder.join(RESOURCES_DIR_NAME)
    }

    /// The absolute path of the resources directory, if it exists.
    pub async fn existing_resources_dir(&self) -> ConfigResult<Option<PathBuf>> {
        let dir = self.resources_dir();
        if !dir_exists(&dir).await? {
            return Ok(None);
        }
        let absolute = std::path::absolute(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Some(absolute))
    }
}

/// A parsed Job template and where it came from.
#[derive(Debug, Clone)]
pub struct JobTemplate {
    pub job: Job,
    pub location: TemplateLocation,
}

/// Result of looking for a repository's Job template.
#[derive(Debug, Clone)]
pub enum TemplateLoad {
    Loaded(JobTemplate),
    /// The repository has no `job.yaml`.
    NotConfigured { job_file: PathBuf },
}

/// Pick the template folder inside a checkout.
pub async fn resolve_template_location(checkout: &Path) -> ConfigResult<TemplateLocation> {
    let version_stream = join_all(checkout, VERSION_STREAM_FOLDER);
    let folder = if dir_exists(&version_stream).await? {
        version_stream
    } else {
        join_all(checkout, DEFAULT_FOLDER)
    };
    let job_file = folder.join(JOB_FILE_NAME);
    debug!(folder = %folder.display(), "resolved Job template folder");
    Ok(TemplateLocation { folder, job_file })
}

/// Find and parse the Job template of a checked out repository.
pub async fn load_job_template(checkout: &Path, repository: &str) -> ConfigResult<TemplateLoad> {
    let location = resolve_template_location(checkout).await?;

    if !file_exists(&location.job_file).await? {
        info!(
            repository = %repository,
            job_file = %location.job_file.display(),
            "repository does not have a Job file"
        );
        return Ok(TemplateLoad::NotConfigured {
            job_file: location.job_file,
        });
    }

    let content = tokio::fs::read_to_string(&location.job_file)
        .await
        .map_err(|source| ConfigError::Io {
            path: location.job_file.clone(),
            source,
        })?;
    let job = parse_job_template(&content, &location.job_file)?;

    info!(
        repository = %repository,
        job_file = %location.job_file.display(),
        "loaded Job template"
    );
    Ok(TemplateLoad::Loaded(JobTemplate { job, location }))
}

/// Parse Job template YAML. `path` is only used for error reporting.
pub fn parse_job_template(yaml: &str, path: &Path) -> ConfigResult<Job> {
    serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn join_all(base: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(base.to_path_buf(), |path, part| path.join(part))
}

async fn dir_exists(path: &Path) -> ConfigResult<bool> {
    metadata_matches(path, |m| m.is_dir()).await
}

async fn file_exists(path: &Path) -> ConfigResult<bool> {
    metadata_matches(path, |m| m.is_file()).await
}

async fn metadata_matches(
    path: &Path,
    check: impl FnOnce(&std::fs::Metadata) -> bool,
) -> ConfigResult<bool> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => Ok(check(&metadata)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
