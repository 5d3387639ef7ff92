//! Error types for gitjob.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("failed to find Jobs in namespace {namespace} with selector {selector}")]
    Store {
        namespace: String,
        selector: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to create Job {name} in namespace {namespace}")]
    Submit {
        name: String,
        namespace: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load Job file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to apply resources in dir {}", .dir.display())]
    ResourceApply {
        dir: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("kubernetes API error: {0}")]
    Api(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
