//! Core domain types and traits for the gitjob dispatcher.
//!
//! This crate contains:
//! - Label value normalization and structured label selectors
//! - The dispatch decision engine
//! - Job materialization (naming and labeling of templates)
//! - Job store, command runner and launcher traits

pub mod decision;
pub mod error;
pub mod job;
pub mod labels;
pub mod launch;
pub mod materialize;
pub mod naming;
pub mod repository;
pub mod runner;
pub mod store;

pub use error::{Error, Result};
pub use k8s_openapi::api::batch::v1::Job;
pub use labels::LabelSelector;
pub use naming::LabelValue;
pub use repository::RepositoryRef;
