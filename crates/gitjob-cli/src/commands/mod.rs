//! CLI command implementations.

pub mod launch;

use anyhow::{Context, Result, bail};
use gitjob_config::{OperatorConfig, TemplateLoad, load_job_template, load_operator_config};
use gitjob_core::materialize::resource_name;
use gitjob_core::{LabelValue, RepositoryRef};
use std::path::Path;

/// Operator configuration with command line overrides applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: OperatorConfig,
}

impl Settings {
    pub async fn load(
        config_path: Option<&Path>,
        namespace: Option<String>,
        kubectl: Option<String>,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => load_operator_config(path)
                .await
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => OperatorConfig::default(),
        };
        Ok(Self::with_overrides(config, namespace, kubectl))
    }

    fn with_overrides(
        mut config: OperatorConfig,
        namespace: Option<String>,
        kubectl: Option<String>,
    ) -> Self {
        if let Some(namespace) = namespace.filter(|ns| !ns.is_empty()) {
            config.namespace = Some(namespace);
        }
        if let Some(kubectl) = kubectl.filter(|k| !k.is_empty()) {
            config.kubectl = kubectl;
        }
        Self { config }
    }
}

pub async fn validate(dir: &Path) -> Result<()> {
    match load_job_template(dir, &dir.display().to_string())
        .await
        .with_context(|| format!("Failed to load Job template in {}", dir.display()))?
    {
        TemplateLoad::Loaded(template) => {
            println!("Job template: {}", template.location.job_file.display());
            match template
                .location
                .existing_resources_dir()
                .await
                .context("Failed to check resources directory")?
            {
                Some(resources) => println!("Resources directory: {}", resources.display()),
                None => println!("Resources directory: none"),
            }
            println!("Configuration is valid");
            Ok(())
        }
        TemplateLoad::NotConfigured { job_file } => {
            bail!("no Job template found at {}", job_file.display())
        }
    }
}

pub fn name(repo: &str, sha: &str) {
    let repository = RepositoryRef::new(repo);
    println!(
        "{}",
        resource_name(&repository.safe_name(), &LabelValue::new(sha))
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let settings = Settings::with_overrides(
            OperatorConfig::default(),
            Some("team-a".to_string()),
            Some("/opt/kubectl".to_string()),
        );
        assert_eq!(settings.config.namespace.as_deref(), Some("team-a"));
        assert_eq!(settings.config.kubectl, "/opt/kubectl");
    }

    #[test]
    fn test_empty_overrides_ignored() {
        let config = OperatorConfig {
            namespace: Some("jx".to_string()),
            ..Default::default()
        };
        let settings = Settings::with_overrides(config, Some(String::new()), None);
        assert_eq!(settings.config.namespace.as_deref(), Some("jx"));
        assert_eq!(settings.config.kubectl, "kubectl");
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitjob.kdl");
        std::fs::write(&path, "namespace \"ops\"\nno-resource-apply #true\n").unwrap();

        let settings = Settings::load(Some(&path), None, None).await.unwrap();
        assert_eq!(settings.config.namespace.as_deref(), Some("ops"));
        assert!(settings.config.no_resource_apply);
    }

    #[tokio::test]
    async fn test_validate_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_validate_existing_template() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join(".jx").join("git-operator");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(
            folder.join("job.yaml"),
            "apiVersion: batch/v1\nkind: Job\nspec:\n  template:\n    spec:\n      containers: []\n",
        )
        .unwrap();
        assert!(validate(dir.path()).await.is_ok());
    }
}
