//! Configuration for gitjob.
//!
//! This crate handles:
//! - Discovering and parsing a repository's Job template (YAML)
//! - Operator configuration (KDL)

pub mod error;
pub mod system;
pub mod template;

pub use error::{ConfigError, ConfigResult};
pub use system::{OperatorConfig, load_operator_config, parse_operator_config};
pub use template::{JobTemplate, TemplateLoad, TemplateLocation, load_job_template};
