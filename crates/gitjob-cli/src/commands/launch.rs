//! One dispatch cycle against the current cluster.

use anyhow::{Context, Result};
use gitjob_core::RepositoryRef;
use gitjob_core::job::job_name;
use gitjob_core::launch::{LaunchOutcome, LaunchRequest, Launcher};
use gitjob_executor::{KubernetesJobStore, ProcessCommandRunner};
use gitjob_launcher::JobLauncher;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::Settings;
use crate::OutputFormat;

pub struct LaunchArgs {
    pub repo: String,
    pub repo_namespace: String,
    pub sha: String,
    pub dir: PathBuf,
    pub no_resource_apply: bool,
    pub output: OutputFormat,
}

pub async fn run(settings: Settings, args: LaunchArgs) -> Result<()> {
    let store = KubernetesJobStore::new()
        .await
        .context("Failed to connect to Kubernetes")?;
    let namespace = settings
        .config
        .namespace
        .clone()
        .unwrap_or_else(|| store.default_namespace().to_string());
    info!(namespace = %namespace, store = "kubernetes", "connected");

    let launcher = JobLauncher::new(Arc::new(store), Arc::new(ProcessCommandRunner::new()), namespace)
        .with_selector(settings.config.selector.clone())
        .context("Invalid base selector")?
        .with_kubectl(settings.config.kubectl.clone());

    let request = LaunchRequest::new(
        RepositoryRef::new(&args.repo).with_namespace(args.repo_namespace),
        &args.sha,
        &args.dir,
    )
    .with_no_resource_apply(args.no_resource_apply || settings.config.no_resource_apply);

    let outcome = launcher
        .launch(&request)
        .await
        .with_context(|| format!("Failed to launch Job for {} at {}", args.repo, args.sha))?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => print_outcome(&outcome, launcher.namespace()),
    }
    Ok(())
}

fn print_outcome(outcome: &LaunchOutcome, default_namespace: &str) {
    match outcome {
        LaunchOutcome::Created { jobs } => {
            for job in jobs {
                let namespace = job.metadata.namespace.as_deref().unwrap_or(default_namespace);
                println!("Created Job {} in namespace {}", job_name(job), namespace);
            }
        }
        LaunchOutcome::Skipped { reason } => {
            println!("Skipped: {}", reason);
        }
        LaunchOutcome::NotConfigured {
            repository,
            job_file,
        } => {
            println!(
                "Repository {} does not have a Job file: {}",
                repository,
                job_file.display()
            );
        }
    }
}
