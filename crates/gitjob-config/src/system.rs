//! Operator configuration parsing.
//!
//! ```kdl
//! namespace "jx"
//! selector "gitjob.io/managed-by=gitjob"
//! kubectl "/usr/local/bin/kubectl"
//! no-resource-apply #false
//! ```

use crate::{ConfigError, ConfigResult};
use gitjob_core::LabelSelector;
use kdl::{KdlDocument, KdlNode};
use std::path::Path;

pub const DEFAULT_KUBECTL: &str = "kubectl";

/// Process-wide dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorConfig {
    /// Namespace for Jobs when the repository has no override.
    /// When unset the kube client's default namespace is used.
    pub namespace: Option<String>,
    /// Base selector every repository selector is built from.
    pub selector: LabelSelector,
    /// Binary used to apply the `resources` directory.
    pub kubectl: String,
    /// Never apply `resources` directories.
    pub no_resource_apply: bool,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            selector: LabelSelector::managed_by(),
            kubectl: DEFAULT_KUBECTL.to_string(),
            no_resource_apply: false,
        }
    }
}

/// Parse operator configuration from KDL text. Every node is optional.
pub fn parse_operator_config(kdl: &str) -> ConfigResult<OperatorConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = OperatorConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "namespace" => {
                let namespace = required_string(node, "namespace")?;
                config.namespace = (!namespace.is_empty()).then_some(namespace);
            }
            "selector" => {
                let text = required_string(node, "selector")?;
                let selector = LabelSelector::parse(&text)
                    .and_then(|selector| selector.validate_base().map(|()| selector))
                    .map_err(|e| ConfigError::InvalidValue {
                        field: "selector".to_string(),
                        message: e.to_string(),
                    })?;
                config.selector = selector;
            }
            "kubectl" => {
                let kubectl = required_string(node, "kubectl")?;
                if kubectl.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "kubectl".to_string(),
                        message: "must not be empty".to_string(),
                    });
                }
                config.kubectl = kubectl;
            }
            "no-resource-apply" | "no_resource_apply" => {
                config.no_resource_apply = get_first_bool_arg(node).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        field: "no-resource-apply".to_string(),
                        message: "expected #true or #false".to_string(),
                    }
                })?;
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(config)
}

/// Read and parse an operator configuration file.
pub async fn load_operator_config(path: &Path) -> ConfigResult<OperatorConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_operator_config(&content)
}

fn required_string(node: &KdlNode, field: &str) -> ConfigResult<String> {
    get_first_string_arg(node).ok_or_else(|| ConfigError::MissingField(field.to_string()))
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_first_bool_arg(node: &KdlNode) -> Option<bool> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_bool())
}
