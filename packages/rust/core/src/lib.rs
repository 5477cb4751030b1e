//! Core pipeline orchestration for agentdocs.
//!
//! Ties the document walker, section grouper, artifact generators and output
//! writer into the post-build hook ([`pipeline::post_build`]).

pub mod pipeline;
pub mod sections;
pub mod walker;
pub mod writer;

pub use pipeline::{
    ExportReport, PostBuildHook, ProgressReporter, SilentProgress, build_model, post_build,
};
pub use writer::ArtifactMeta;
