//! Shared types, error model, and configuration for agentdocs.
//!
//! This crate is the foundation depended on by all other agentdocs crates.
//! It provides:
//! - [`AgentDocsError`]: the unified error type
//! - Domain types ([`DocFile`], [`Section`], [`DocModel`])
//! - Configuration ([`DocsConfig`], [`Registry`], config loading)

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, CommandsConfig, DocsConfig, ExportConfig, LinksConfig, SectionsConfig,
    SiteConfig, WalkConfig, clean_base_url, init_config, load_config, load_config_from,
    normalize_base_url,
};
pub use error::{AgentDocsError, Result};
pub use registry::{CliCommand, ObjectKind, Registry};
pub use types::{DocFile, DocModel, ROOT_SECTION, Section, strip_extension};
