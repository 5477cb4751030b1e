//! Document walker.
//!
//! Scans a document root recursively and parses every content file into a
//! [`DocFile`]. Nothing here is fatal: a missing root yields no documents,
//! unreadable entries are skipped with a warning.

use std::path::Path;

use tracing::{debug, info, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use agentdocs_markdown::{HeaderStatus, extract_title, parse_document, slugify_id};
use agentdocs_shared::{DocFile, DocsConfig, clean_base_url, normalize_base_url, strip_extension};

/// Filters and addressing applied while walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Normalized base URL (`/` or `/segment/`).
    pub base_url: String,
    /// Routing prefix between base URL and document path (may be empty).
    pub route_prefix: String,
    /// Document extensions without the dot.
    pub extensions: Vec<String>,
    /// Directory names never descended into.
    pub exclude_dirs: Vec<String>,
    /// File names skipped even with a recognized extension.
    pub excluded_files: Vec<String>,
}

impl WalkOptions {
    pub fn from_config(config: &DocsConfig, base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            route_prefix: config.site.route_prefix.clone(),
            extensions: config.walk.extensions.clone(),
            exclude_dirs: config.walk.exclude_dirs.clone(),
            excluded_files: config.walk.excluded_files.clone(),
        }
    }

    fn is_document(&self, name: &str) -> bool {
        if self.excluded_files.iter().any(|f| f == name) {
            return false;
        }
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self.extensions.iter().any(|e| e == ext),
            _ => false,
        }
    }

    /// `<clean base>[/<prefix>]/<route>`
    fn url_for(&self, route: &str) -> String {
        let base = clean_base_url(&self.base_url);
        let prefix = self.route_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{base}/{route}")
        } else {
            format!("{base}/{prefix}/{route}")
        }
    }
}

/// Walk `root` and parse every document, sorted by relative path.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn walk_docs(root: &Path, opts: &WalkOptions) -> Vec<DocFile> {
    if !root.is_dir() {
        info!("document root not found, continuing with no documents");
        return Vec::new();
    }

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || keep_entry(entry, opts));

    let mut docs = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !opts.is_document(&name) {
            continue;
        }

        let Some(rel) = relative_path(root, entry.path()) else {
            continue;
        };

        match std::fs::read_to_string(entry.path()) {
            Ok(raw) => docs.push(parse_doc(rel, &raw, opts)),
            Err(e) => warn!(path = %entry.path().display(), error = %e, "skipping unreadable file"),
        }
    }

    docs.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(count = docs.len(), "walked document root");
    docs
}

/// Parse one document's raw text. `rel` uses `/` separators.
pub fn parse_doc(rel: String, raw: &str, opts: &WalkOptions) -> DocFile {
    let parsed = parse_document(raw);
    if let HeaderStatus::Malformed(reason) = &parsed.header {
        warn!(path = %rel, %reason, "malformed metadata header, treating whole file as body");
    }

    let file_name = rel.rsplit('/').next().unwrap_or(&rel);
    let stem = strip_extension(file_name);
    let title = extract_title(&parsed.frontmatter, &parsed.body, stem);
    let route = strip_extension(&rel);

    DocFile {
        id: slugify_id(stem),
        title,
        url: opts.url_for(route),
        content: parsed.body.trim().to_string(),
        frontmatter: parsed.frontmatter,
        section: DocFile::section_for_path(&rel),
        path: rel,
    }
}

fn keep_entry(entry: &DirEntry, opts: &WalkOptions) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return false;
    }
    !(entry.file_type().is_dir() && opts.exclude_dirs.iter().any(|d| *d == name))
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}
