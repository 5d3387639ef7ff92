//! Backends for gitjob's external collaborators.
//!
//! - Kubernetes Job store (production)
//! - Local process command runner (used to run `kubectl apply`)

pub mod kubernetes;
pub mod process;

pub use gitjob_core::runner::{CommandOutput, CommandRunner, CommandSpec};
pub use gitjob_core::store::JobStore;
pub use kubernetes::KubernetesJobStore;
pub use process::ProcessCommandRunner;
