//! Launcher that submits Kubernetes Jobs for new commits.

use async_trait::async_trait;
use gitjob_config::system::DEFAULT_KUBECTL;
use gitjob_config::template::TemplateLocation;
use gitjob_config::{TemplateLoad, load_job_template};
use gitjob_core::decision::{Decision, decide};
use gitjob_core::job::job_name;
use gitjob_core::launch::{LaunchOutcome, LaunchRequest, Launcher};
use gitjob_core::materialize::materialize;
use gitjob_core::runner::{CommandRunner, CommandSpec};
use gitjob_core::store::JobStore;
use gitjob_core::{Error, Job, LabelSelector, LabelValue, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Dispatches at most one Job per repository at a time, and at most one per
/// commit.
pub struct JobLauncher {
    store: Arc<dyn JobStore>,
    runner: Arc<dyn CommandRunner>,
    /// Namespace used when the repository does not override it.
    namespace: String,
    /// Base selector; the repository label is added per launch.
    selector: LabelSelector,
    kubectl: String,
}

impl JobLauncher {
    pub fn new(
        store: Arc<dyn JobStore>,
        runner: Arc<dyn CommandRunner>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            store,
            runner,
            namespace: namespace.into(),
            selector: LabelSelector::managed_by(),
            kubectl: DEFAULT_KUBECTL.to_string(),
        }
    }

    /// Replace the base selector. It must not pin the repository or commit
    /// labels, which are set per Job.
    pub fn with_selector(mut self, selector: LabelSelector) -> Result<Self> {
        selector.validate_base()?;
        self.selector = selector;
        Ok(self)
    }

    pub fn with_kubectl(mut self, kubectl: impl Into<String>) -> Self {
        self.kubectl = kubectl.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// List the repository's Jobs. A missing collection counts as empty.
    async fn existing_jobs(&self, namespace: &str, selector: &LabelSelector) -> Result<Vec<Job>> {
        match self.store.list(namespace, selector).await {
            Ok(jobs) => Ok(jobs),
            Err(Error::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(Error::Store {
                namespace: namespace.to_string(),
                selector: selector.to_string(),
                source: Box::new(e),
            }),
        }
    }

    async fn start_new_job(&self, request: &LaunchRequest, namespace: &str) -> Result<LaunchOutcome> {
        let safe_name = request.repository.safe_name();
        let safe_sha = LabelValue::new(&request.git_sha);
        info!(
            repository = %safe_name,
            sha = %safe_sha,
            "about to create a new Job"
        );

        let template = match load_job_template(&request.dir, safe_name.as_str()).await? {
            TemplateLoad::Loaded(template) => template,
            TemplateLoad::NotConfigured { job_file } => {
                return Ok(LaunchOutcome::NotConfigured {
                    repository: safe_name.to_string(),
                    job_file,
                });
            }
        };

        if !request.no_resource_apply {
            self.apply_resources(&template.location).await?;
        }

        let job = materialize(
            template.job,
            &self.selector,
            &request.repository,
            &request.git_sha,
        );
        let created = self.submit(namespace, job).await?;
        Ok(LaunchOutcome::Created {
            jobs: vec![created],
        })
    }

    /// Apply the `resources` directory next to the template, if there is one.
    async fn apply_resources(&self, location: &TemplateLocation) -> Result<()> {
        let Some(dir) = location.existing_resources_dir().await? else {
            return Ok(());
        };

        let command = CommandSpec::new(&self.kubectl)
            .arg("apply")
            .arg("-f")
            .arg(dir.display().to_string());
        info!(command = %command, "applying resources");

        self.runner
            .run(&command)
            .await
            .map_err(|e| Error::ResourceApply {
                dir: dir.clone(),
                source: Box::new(e),
            })?;
        Ok(())
    }

    async fn submit(&self, namespace: &str, job: Job) -> Result<Job> {
        let name = job_name(&job).to_string();
        match self.store.create(namespace, job).await {
            Ok(created) => {
                info!(job = %name, namespace = %namespace, "created Job");
                Ok(created)
            }
            Err(e) => {
                warn!(job = %name, namespace = %namespace, error = %e, "failed to create Job");
                Err(Error::Submit {
                    name,
                    namespace: namespace.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }
}

#[async_trait]
impl Launcher for JobLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutcome> {
        let namespace = request.repository.namespace_or(&self.namespace);
        let selector = self
            .selector
            .for_repository(&request.repository.safe_name())?;

        let existing = self.existing_jobs(namespace, &selector).await?;

        match decide(&request.repository, &request.git_sha, &existing) {
            Decision::Skip(reason) => {
                info!(
                    repository = %request.repository.name,
                    sha = %request.git_sha,
                    reason = %reason,
                    "not creating a Job"
                );
                Ok(LaunchOutcome::Skipped { reason })
            }
            Decision::Proceed => self.start_new_job(request, namespace).await,
        }
    }
}
