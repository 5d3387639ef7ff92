//! Configuration parsing errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error("failed to parse {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl From<ConfigError> for gitjob_core::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Yaml { path, source } => gitjob_core::Error::Parse {
                path,
                message: source.to_string(),
            },
            ConfigError::Io { path, source } => gitjob_core::Error::Io { path, source },
            other => gitjob_core::Error::InvalidInput(other.to_string()),
        }
    }
}
