//! Inline link rewriting.
//!
//! Two addressing schemes share one resolver:
//! - anchor mode points every internal link at a heading of the flattened
//!   knowledge export,
//! - absolute mode turns relative links into clean site paths for the
//!   per-section bundles.

use std::collections::HashSet;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::trace;
use url::Url;

use agentdocs_shared::DocFile;

use crate::anchor::to_anchor;
use crate::fence::{map_prose, prose_lines};

/// `[text](target "optional title")` with an optional leading `!` for images.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[([^\]]+)\]\(([^)\s]+)((?:\s+[^)]*)?)\)"#).expect("valid regex")
});

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("valid regex"));

/// Placeholder origin used only to run RFC 3986 path resolution.
static JOIN_ORIGIN: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://docs.invalid/").expect("valid origin"));

/// Settings that decide which targets are internal.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Base path without trailing slash (`/developer-docs`, or empty).
    pub base_path: String,
    /// Absolute prefixes that address site documents (`/docs/`).
    pub internal_prefixes: Vec<String>,
    /// Path fragments that are never rewritten (`/api/schema/`).
    pub reserved_paths: Vec<String>,
    /// Document extensions stripped from targets, without the dot.
    pub extensions: Vec<String>,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            internal_prefixes: vec!["/docs/".into()],
            reserved_paths: vec!["/api/schema/".into()],
            extensions: vec!["md".into(), "mdx".into()],
        }
    }
}

/// A cross-link harvested from a document body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelatedLink {
    pub title: String,
    pub url: String,
}

/// Rewrites inline links against a fixed set of documents.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    /// `(route, title)` pairs in path order.
    routes: Vec<(String, String)>,
    opts: LinkOptions,
}

impl LinkResolver {
    /// Resolve against `docs`, each addressed by its own title.
    pub fn new(docs: &[DocFile], opts: LinkOptions) -> Self {
        Self::from_routes(
            docs.iter()
                .map(|doc| (doc.route().to_string(), doc.title.clone())),
            opts,
        )
    }

    /// Resolve against explicit `(route, heading title)` pairs.
    ///
    /// Anchor mode points at the heading a document is rendered under, which
    /// is not always its own title (index pages live under their section).
    pub fn from_routes(
        routes: impl IntoIterator<Item = (String, String)>,
        opts: LinkOptions,
    ) -> Self {
        let mut routes: Vec<(String, String)> = routes.into_iter().collect();
        routes.sort_by(|a, b| a.0.cmp(&b.0));
        Self { routes, opts }
    }

    /// Point every internal link at a heading anchor of the flattened export.
    ///
    /// Links to known documents use the document title; anything else falls
    /// back to the link text.
    pub fn resolve_anchors(&self, content: &str) -> String {
        map_prose(content, |prose| {
            LINK_RE
                .replace_all(prose, |caps: &Captures| {
                    let (bang, text, target, tail) = (&caps[1], &caps[2], &caps[3], &caps[4]);
                    if !bang.is_empty() || self.is_passthrough(target) {
                        return caps[0].to_string();
                    }

                    let route = self.normalize_route(target);
                    let anchor = match self.find_title(&route) {
                        Some(title) => to_anchor(title),
                        None => {
                            trace!(link = target, "link target not found, using link text");
                            to_anchor(text)
                        }
                    };
                    format!("[{text}](#{anchor}{tail})")
                })
                .into_owned()
        })
    }

    /// Rewrite internal links as clean absolute paths relative to `doc_url`.
    pub fn resolve_absolute(&self, content: &str, doc_url: &str) -> String {
        map_prose(content, |prose| {
            LINK_RE
                .replace_all(prose, |caps: &Captures| {
                    let (bang, text, target, tail) = (&caps[1], &caps[2], &caps[3], &caps[4]);
                    if !bang.is_empty() || self.is_passthrough(target) {
                        return caps[0].to_string();
                    }
                    match self.absolute_target(target, doc_url) {
                        Some(resolved) => format!("[{text}]({resolved}{tail})"),
                        None => caps[0].to_string(),
                    }
                })
                .into_owned()
        })
    }

    /// Relative-style links in `content`, resolved against `doc_url`.
    ///
    /// Only `./`, `../`, bare relative and internal-prefix targets count.
    /// Duplicates by `(title, url)` are dropped, keeping first-seen order.
    pub fn related_links(&self, content: &str, doc_url: &str) -> Vec<RelatedLink> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for line in prose_lines(content) {
            for caps in LINK_RE.captures_iter(line) {
                let (bang, text, target) = (&caps[1], &caps[2], &caps[3]);
                if !bang.is_empty() || self.is_passthrough(target) || !self.is_relative_style(target)
                {
                    continue;
                }
                let Some(url) = self.absolute_target(target, doc_url) else {
                    continue;
                };
                let link = RelatedLink {
                    title: text.to_string(),
                    url,
                };
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }

        links
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    fn is_passthrough(&self, target: &str) -> bool {
        target.starts_with('#')
            || is_external(target)
            || self
                .opts
                .reserved_paths
                .iter()
                .any(|reserved| target.contains(reserved.as_str()))
    }

    fn is_relative_style(&self, target: &str) -> bool {
        target.starts_with("./")
            || target.starts_with("../")
            || !target.starts_with('/')
            || self
                .opts
                .internal_prefixes
                .iter()
                .any(|prefix| target.starts_with(prefix.as_str()))
    }

    // -----------------------------------------------------------------------
    // Anchor mode
    // -----------------------------------------------------------------------

    /// Reduce a link target to a document route (`guides/b`).
    fn normalize_route(&self, target: &str) -> String {
        let mut route = target.split(['#', '?']).next().unwrap_or_default();

        let base = self.opts.base_path.as_str();
        if !base.is_empty() {
            if let Some(rest) = route.strip_prefix(base) {
                if rest.is_empty() || rest.starts_with('/') {
                    route = rest;
                }
            }
        }

        if let Some(rest) = self
            .opts
            .internal_prefixes
            .iter()
            .find_map(|prefix| route.strip_prefix(prefix.as_str()))
        {
            route = rest;
        }

        loop {
            if let Some(rest) = route.strip_prefix("./") {
                route = rest;
            } else if let Some(rest) = route.strip_prefix("../") {
                route = rest;
            } else if let Some(rest) = route.strip_prefix('/') {
                route = rest;
            } else {
                break;
            }
        }

        let route = route.trim_end_matches('/');
        self.strip_doc_extension(route).to_string()
    }

    /// Exact route, then suffix on a `/` boundary, then `<route>/index`.
    fn find_title(&self, route: &str) -> Option<&str> {
        if route.is_empty() {
            return None;
        }

        let suffix = format!("/{route}");
        let index = format!("{route}/index");

        self.routes
            .iter()
            .find(|(r, _)| r == route)
            .or_else(|| self.routes.iter().find(|(r, _)| r.ends_with(&suffix)))
            .or_else(|| self.routes.iter().find(|(r, _)| *r == index))
            .map(|(_, title)| title.as_str())
    }

    // -----------------------------------------------------------------------
    // Absolute mode
    // -----------------------------------------------------------------------

    fn absolute_target(&self, target: &str, doc_url: &str) -> Option<String> {
        let page = JOIN_ORIGIN.join(doc_url).ok()?;
        let joined = page.join(target).ok()?;

        // Page urls are unencoded, so links must be too.
        let decoded = percent_decode_str(joined.path()).decode_utf8_lossy();
        let path = self.strip_doc_extension(&decoded);
        let path = path.trim_end_matches('/');
        let mut resolved = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };

        if let Some(query) = joined.query() {
            resolved.push('?');
            resolved.push_str(query);
        }
        if let Some(fragment) = joined.fragment() {
            resolved.push('#');
            resolved.push_str(fragment);
        }

        Some(resolved)
    }

    fn strip_doc_extension<'a>(&self, path: &'a str) -> &'a str {
        for ext in &self.opts.extensions {
            if let Some(stem) = path
                .strip_suffix(ext.as_str())
                .and_then(|rest| rest.strip_suffix('.'))
            {
                return stem;
            }
        }
        path
    }
}

fn is_external(target: &str) -> bool {
    target.starts_with("//") || SCHEME_RE.is_match(target)
}
