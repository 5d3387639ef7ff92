//! Watched repository references.

use crate::naming::LabelValue;
use serde::{Deserialize, Serialize};

/// A repository whose commits trigger Jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository name as supplied by the git poller.
    pub name: String,
    /// Namespace to launch Jobs in; the launcher default is used when unset.
    pub namespace: Option<String>,
}

impl RepositoryRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Set the namespace override. An empty string means no override.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = if namespace.is_empty() {
            None
        } else {
            Some(namespace)
        };
        self
    }

    /// The repository name as a label value.
    pub fn safe_name(&self) -> LabelValue {
        LabelValue::new(&self.name)
    }

    /// The namespace to use, falling back to `default`.
    pub fn namespace_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.namespace.as_deref().unwrap_or(default)
    }
}
