//! Export configuration for agentdocs.
//!
//! Project config lives at `<site>/agentdocs.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AgentDocsError, Result};
use crate::types::ROOT_SECTION;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "agentdocs.toml";

// ---------------------------------------------------------------------------
// Config structs (matching agentdocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level export config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Site addressing.
    #[serde(default)]
    pub site: SiteConfig,

    /// Document walk filters.
    #[serde(default)]
    pub walk: WalkConfig,

    /// Section ordering and titles.
    #[serde(default)]
    pub sections: SectionsConfig,

    /// Link resolution settings.
    #[serde(default)]
    pub links: LinksConfig,

    /// Which artifacts to emit and where static content comes from.
    #[serde(default)]
    pub export: ExportConfig,

    /// CLI reference extraction.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Discovery registry override. Built-in registry when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<crate::registry::Registry>,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Effective base URL of the built site (e.g. `/developer-docs/`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Public origin used for schema `$id` values.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Routing prefix inserted between the base URL and document paths.
    #[serde(default)]
    pub route_prefix: String,

    /// Document root, relative to the working directory.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            site_url: default_site_url(),
            route_prefix: String::new(),
            docs_dir: default_docs_dir(),
        }
    }
}

fn default_base_url() -> String {
    "/".into()
}
fn default_site_url() -> String {
    "https://strata.do".into()
}
fn default_docs_dir() -> String {
    "docs".into()
}

/// `[walk]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// File extensions parsed as documents (without the dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// File names skipped even when their extension matches.
    #[serde(default = "default_excluded_files")]
    pub excluded_files: Vec<String>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            excluded_files: default_excluded_files(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".into(), "mdx".into()]
}
fn default_exclude_dirs() -> Vec<String> {
    vec!["img".into(), "node_modules".into()]
}
fn default_excluded_files() -> Vec<String> {
    vec!["_category_.json".into(), "_category_.yml".into()]
}

/// `[sections]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsConfig {
    /// Canonical section priority. Unlisted sections sort after, by id.
    #[serde(default = "default_section_order")]
    pub order: Vec<String>,

    /// Display titles for known section ids.
    #[serde(default = "default_section_titles")]
    pub titles: BTreeMap<String, String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            order: default_section_order(),
            titles: default_section_titles(),
        }
    }
}

fn default_section_order() -> Vec<String> {
    [
        "getting-started",
        "guides",
        "cli",
        "semantic-model",
        "advanced",
        "reference",
        "examples",
        "api",
        "troubleshooting",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_section_titles() -> BTreeMap<String, String> {
    [
        (ROOT_SECTION, "Documentation"),
        ("getting-started", "Getting Started"),
        ("cli", "CLI Reference"),
        ("semantic-model", "Semantic Model"),
        ("advanced", "Advanced Features"),
        ("examples", "Examples"),
        ("api", "API"),
        ("troubleshooting", "Troubleshooting"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// `[links]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Absolute prefixes that address other documents of this site.
    #[serde(default = "default_internal_prefixes")]
    pub internal_prefixes: Vec<String>,

    /// Path fragments that are never rewritten (published schema URLs).
    #[serde(default = "default_reserved_paths")]
    pub reserved_paths: Vec<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            internal_prefixes: default_internal_prefixes(),
            reserved_paths: default_reserved_paths(),
        }
    }
}

fn default_internal_prefixes() -> Vec<String> {
    vec!["/docs/".into()]
}
fn default_reserved_paths() -> Vec<String> {
    vec!["/api/schema/".into()]
}

/// `[export]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Artifact families to emit: `knowledge`, `discovery`, `schemas`, `bundles`.
    #[serde(default = "default_emit")]
    pub emit: Vec<String>,

    /// Directory holding `preamble.md`, `rules.md`, `examples.md` and
    /// `mistakes.md`. Built-in content is used for any file that is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_dir: Option<String>,

    /// Directory names whose documents stay out of `llms.txt`. They still
    /// appear in the section bundles.
    #[serde(default = "default_knowledge_exclude_dirs")]
    pub knowledge_exclude_dirs: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            emit: default_emit(),
            content_dir: None,
            knowledge_exclude_dirs: default_knowledge_exclude_dirs(),
        }
    }
}

fn default_knowledge_exclude_dirs() -> Vec<String> {
    // Machine-integration pages; the flattened export never inlines them.
    vec!["api".into()]
}

fn default_emit() -> Vec<String> {
    ["knowledge", "discovery", "schemas", "bundles"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `[commands]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Section holding command reference pages.
    #[serde(default = "default_commands_section")]
    pub section: String,

    /// Path fragment a reference page must contain to count as a command page.
    #[serde(default = "default_path_marker")]
    pub path_marker: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            section: default_commands_section(),
            path_marker: default_path_marker(),
        }
    }
}

fn default_commands_section() -> String {
    "reference".into()
}
fn default_path_marker() -> String {
    "cli/".into()
}

// ---------------------------------------------------------------------------
// Base URL helpers
// ---------------------------------------------------------------------------

/// Normalize a host-provided base URL to `/segment/.../` form.
///
/// An empty value maps to `/`.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return "/".into();
    }
    format!("/{trimmed}/")
}

/// Base URL without its trailing slash (`/` becomes the empty string).
pub fn clean_base_url(base_url: &str) -> &str {
    base_url.strip_suffix('/').unwrap_or(base_url)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `agentdocs.toml` from a directory. Returns defaults if the file does not exist.
pub fn load_config(dir: &Path) -> Result<DocsConfig> {
    let path = dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(DocsConfig::default());
    }

    load_config_from(&path)
}

/// Load the export config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<DocsConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AgentDocsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        AgentDocsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Write a default `agentdocs.toml` into `dir`.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| AgentDocsError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(AgentDocsError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let config = DocsConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AgentDocsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AgentDocsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
