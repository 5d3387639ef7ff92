//! Kubernetes Job store implementation.

use async_trait::async_trait;
use gitjob_core::store::JobStore;
use gitjob_core::{Error, Job, LabelSelector, Result};
use kube::Client;
use kube::api::{Api, ListParams, PostParams};
use tracing::debug;

/// Job store backed by the Kubernetes batch/v1 API.
pub struct KubernetesJobStore {
    client: Client,
}

impl KubernetesJobStore {
    /// Connect using the in-cluster config or the local kubeconfig.
    pub async fn new() -> Result<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| Error::Internal(format!("failed to create the kube client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Namespace of the current kube context.
    pub fn default_namespace(&self) -> &str {
        self.client.default_namespace()
    }

    fn jobs(&self, namespace: &str) -> Api<Job> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl JobStore for KubernetesJobStore {
    fn name(&self) -> &'static str {
        "kubernetes"
    }

    async fn list(&self, namespace: &str, selector: &LabelSelector) -> Result<Vec<Job>> {
        let params = ListParams::default().labels(&selector.to_string());
        debug!(namespace = %namespace, selector = %selector, "listing Jobs");

        match self.jobs(namespace).list(&params).await {
            Ok(list) => Ok(list.items),
            Err(kube::Error::Api(response)) if response.code == 404 => Err(Error::NotFound(
                format!("Jobs in namespace {}", namespace),
            )),
            Err(e) => Err(Error::Api(e.to_string())),
        }
    }

    async fn create(&self, namespace: &str, job: Job) -> Result<Job> {
        self.jobs(namespace)
            .create(&PostParams::default(), &job)
            .await
            .map_err(create_error)
    }
}

fn create_error(err: kube::Error) -> Error {
    match err {
        kube::Error::Api(response) if response.code == 409 => {
            Error::AlreadyExists(response.message)
        }
        other => Error::Api(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str, message: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: message.to_string(),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_conflict_maps_to_already_exists() {
        let err = create_error(api_error(
            409,
            "AlreadyExists",
            "jobs.batch \"demo-abc\" already exists",
        ));
        match err {
            Error::AlreadyExists(message) => assert!(message.contains("demo-abc")),
            other => panic!("expected already exists, got {:?}", other),
        }
    }

    #[test]
    fn test_other_failures_map_to_api() {
        let err = create_error(api_error(403, "Forbidden", "jobs.batch is forbidden"));
        assert!(matches!(err, Error::Api(_)));
    }
}
