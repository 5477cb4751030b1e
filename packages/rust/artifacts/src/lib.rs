//! Export artifact generators for agentdocs.
//!
//! Every generator reads the same fully built [`DocModel`] and returns the
//! files it would write. Placing them on disk is the writer's job, so
//! generators stay pure and can be tested without a filesystem.

// Large `json!` literals in the schema bodies.
#![recursion_limit = "256"]

pub mod bundles;
pub mod commands;
pub mod content;
pub mod discovery;
pub mod knowledge;
pub mod schemas;

use serde::Serialize;

use agentdocs_markdown::LinkOptions;
use agentdocs_shared::{
    AgentDocsError, CommandsConfig, DocModel, DocsConfig, ObjectKind, Registry, Result,
    clean_base_url, normalize_base_url,
};

pub use bundles::SectionBundles;
pub use commands::{CommandEntry, CommandExtractor, HeadingExtractor, command_slug};
pub use content::{Appendix, ExportContent};
pub use discovery::DiscoveryIndex;
pub use knowledge::KnowledgeExport;
pub use schemas::SchemaRegistry;

/// Knowledge export location, relative to the output root.
pub const KNOWLEDGE_PATH: &str = "llms.txt";

/// Machine-integration directory, relative to the output root.
pub const API_DIR: &str = "api";

/// Output path of a kind's schema, relative to the output root.
///
/// The discovery index and the schema writer both go through this.
pub fn schema_path(kind: &ObjectKind) -> String {
    format!("{API_DIR}/schema/{}", kind.schema_file_name())
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// One file to be written under the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Relative path with `/` separators.
    pub path: String,
    pub contents: String,
}

impl Artifact {
    pub fn text(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Pretty-printed JSON in field declaration order.
    pub fn json<T: Serialize + ?Sized>(path: impl Into<String>, value: &T) -> Result<Self> {
        Ok(Self {
            path: path.into(),
            contents: serde_json::to_string_pretty(value)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Generator context
// ---------------------------------------------------------------------------

/// Inputs shared by every generator for one run.
#[derive(Debug, Clone)]
pub struct GenerateContext {
    /// Normalized base URL (`/` or `/segment/`).
    pub base_url: String,
    /// Public origin for schema `$id` values.
    pub site_url: String,
    pub links: LinkOptions,
    pub commands: CommandsConfig,
    pub registry: Registry,
    pub content: ExportContent,
    /// Directory names left out of the knowledge export.
    pub knowledge_exclude_dirs: Vec<String>,
}

impl GenerateContext {
    /// Build a context from loaded config, an effective base URL and the
    /// static export content.
    pub fn new(config: &DocsConfig, base_url: &str, content: ExportContent) -> Self {
        let base_url = normalize_base_url(base_url);
        let links = LinkOptions {
            base_path: clean_base_url(&base_url).to_string(),
            internal_prefixes: config.links.internal_prefixes.clone(),
            reserved_paths: config.links.reserved_paths.clone(),
            extensions: config.walk.extensions.clone(),
        };

        Self {
            site_url: config.site.site_url.trim_end_matches('/').to_string(),
            links,
            commands: config.commands.clone(),
            registry: config.registry.clone().unwrap_or_default(),
            content,
            knowledge_exclude_dirs: config.export.knowledge_exclude_dirs.clone(),
            base_url,
        }
    }

    /// Base URL without its trailing slash (empty for `/`).
    pub fn clean_base(&self) -> &str {
        clean_base_url(&self.base_url)
    }

    /// Site-absolute URL of an output path (`/developer-docs/llms.txt`).
    pub fn public_url(&self, output_path: &str) -> String {
        format!("{}/{output_path}", self.clean_base())
    }
}

// ---------------------------------------------------------------------------
// Generator trait
// ---------------------------------------------------------------------------

/// One artifact family.
pub trait ArtifactGenerator {
    /// Family name as used in the `emit` config list.
    fn name(&self) -> &'static str;

    /// Produce this family's files from the built model.
    fn generate(&self, model: &DocModel, ctx: &GenerateContext) -> Result<Vec<Artifact>>;
}

/// Every family, in write precedence order.
pub const FAMILIES: [&str; 4] = ["knowledge", "discovery", "schemas", "bundles"];

/// Instantiate the generators named in `emit`.
///
/// The result follows [`FAMILIES`] order whatever order `emit` uses.
/// Unknown names are a config error.
pub fn generators_for(emit: &[String]) -> Result<Vec<Box<dyn ArtifactGenerator>>> {
    if let Some(unknown) = emit
        .iter()
        .find(|name| !FAMILIES.contains(&name.as_str()))
    {
        return Err(AgentDocsError::config(format!(
            "unknown emit target `{unknown}` (expected one of: {})",
            FAMILIES.join(", ")
        )));
    }

    let mut generators: Vec<Box<dyn ArtifactGenerator>> = Vec::new();
    for family in FAMILIES {
        if !emit.iter().any(|name| name == family) {
            continue;
        }
        let generator: Box<dyn ArtifactGenerator> = match family {
            "knowledge" => Box::new(KnowledgeExport),
            "discovery" => Box::new(DiscoveryIndex),
            "schemas" => Box::new(SchemaRegistry),
            _ => Box::new(SectionBundles::default()),
        };
        generators.push(generator);
    }

    Ok(generators)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_follow_family_order() {
        let emit = vec!["bundles".to_string(), "knowledge".to_string()];
        let names: Vec<_> = generators_for(&emit)
            .expect("known families")
            .iter()
            .map(|g| g.name())
            .collect();
        assert_eq!(names, ["knowledge", "bundles"]);
    }

    #[test]
    fn unknown_family_is_rejected() {
        let err = generators_for(&["pdf".to_string()]).err().expect("error");
        assert!(err.to_string().contains("unknown emit target `pdf`"));
    }

    #[test]
    fn context_normalizes_base_url() {
        let ctx = GenerateContext::new(
            &DocsConfig::default(),
            "developer-docs",
            ExportContent::default(),
        );
        assert_eq!(ctx.base_url, "/developer-docs/");
        assert_eq!(ctx.clean_base(), "/developer-docs");
        assert_eq!(ctx.links.base_path, "/developer-docs");
        assert_eq!(ctx.public_url(KNOWLEDGE_PATH), "/developer-docs/llms.txt");
        assert_eq!(ctx.registry.product, "strata");
    }

    #[test]
    fn schema_path_uses_kind_key() {
        let kind = ObjectKind {
            key: "relation".into(),
            file_pattern: "rel.*.yml".into(),
            description: String::new(),
        };
        assert_eq!(schema_path(&kind), "api/schema/relation.json");
    }
}
