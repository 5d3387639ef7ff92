//! Commit-triggered Job dispatch for gitjob.
//!
//! The launcher runs one dispatch cycle per detected commit: it lists the
//! repository's Jobs, decides whether a new one may start, loads the
//! repository's Job template, applies any extra resources and submits the
//! named and labeled Job.

pub mod launcher;

pub use gitjob_core::launch::{LaunchOutcome, LaunchRequest, Launcher};
pub use launcher::JobLauncher;
