//! Core domain types: parsed documents, sections, and the built model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Section id for documents that sit directly under the document root.
pub const ROOT_SECTION: &str = "root";

// ---------------------------------------------------------------------------
// DocFile
// ---------------------------------------------------------------------------

/// One parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocFile {
    /// Slug of the file stem. Unique only within its directory.
    pub id: String,
    /// Metadata title, else first H1, else file stem.
    pub title: String,
    /// Site URL: base path + route prefix + path without extension.
    pub url: String,
    /// Body with the metadata header removed, trimmed.
    pub content: String,
    /// Metadata header, passed through unvalidated.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub frontmatter: Map<String, Value>,
    /// Top-level directory name, or [`ROOT_SECTION`].
    pub section: String,
    /// Relative path with `/` separators (e.g. `guides/setup.md`).
    pub path: String,
}

impl DocFile {
    /// Section id for a normalized relative path: the first segment when the
    /// path is nested, [`ROOT_SECTION`] otherwise.
    pub fn section_for_path(path: &str) -> String {
        match path.split_once('/') {
            Some((first, _)) => first.to_string(),
            None => ROOT_SECTION.to_string(),
        }
    }

    /// Path without its extension (`guides/setup`). Globally unique, unlike `id`.
    pub fn route(&self) -> &str {
        strip_extension(&self.path)
    }

    /// Whether this is the landing page of its directory.
    pub fn is_index(&self) -> bool {
        self.id == "index"
    }
}

/// Strip the final `.ext` from the last path segment, if any.
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A named, ordered bucket of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Directory name or [`ROOT_SECTION`].
    pub id: String,
    /// Display title.
    pub title: String,
    /// Section landing URL.
    pub url: String,
    /// Documents in canonical order.
    pub items: Vec<DocFile>,
}

// ---------------------------------------------------------------------------
// DocModel
// ---------------------------------------------------------------------------

/// The fully built model every generator reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocModel {
    /// Every document, sorted by path.
    pub docs: Vec<DocFile>,
    /// Sections in canonical order.
    pub sections: Vec<Section>,
}
