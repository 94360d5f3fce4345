//! Service layer - pipeline orchestration
//!
//! Thin composition over the domain values and the collaborator seams.

pub mod pipeline;

pub use pipeline::{BuildArtifact, BuildRequest, ContainerBuilder, LintOptions, LintRunner, Pipeline};
