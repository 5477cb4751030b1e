//! Markdown handling for agentdocs.
//!
//! Splits documents into metadata and body, derives ids, titles and heading
//! anchors, rewrites inline links for the two export addressing schemes, and
//! strips markup that only the rendering host understands.

mod anchor;
mod cleanup;
mod fence;
mod frontmatter;
mod links;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

pub use anchor::to_anchor;
pub use cleanup::sanitize;
pub use frontmatter::{HeaderStatus, ParsedDocument, parse_document};
pub use links::{LinkOptions, LinkResolver, RelatedLink};

/// Slug a file stem: lowercase, runs outside `[a-z0-9-]` become one `-`.
pub fn slugify_id(stem: &str) -> String {
    static NON_SLUG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9-]+").expect("valid regex"));

    NON_SLUG_RE
        .replace_all(&stem.to_lowercase(), "-")
        .into_owned()
}

/// Resolve a document title.
///
/// Priority: non-empty metadata `title`, then the first level-1 heading
/// outside code fences, then `fallback`.
pub fn extract_title(frontmatter: &Map<String, Value>, body: &str, fallback: &str) -> String {
    static H1_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^#[ \t]+(.+)$").expect("valid regex"));

    if let Some(title) = frontmatter
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return title.to_string();
    }

    fence::prose_lines(body)
        .find_map(|line| H1_RE.captures(line.trim_end()))
        .map(|caps| caps[1].trim().trim_end_matches('#').trim_end().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_runs() {
        assert_eq!(slugify_id("Getting_Started"), "getting-started");
        assert_eq!(slugify_id("data types (v2)"), "data-types-v2-");
        assert_eq!(slugify_id("index"), "index");
        assert_eq!(slugify_id("a--b"), "a--b");
    }

    #[test]
    fn title_prefers_frontmatter() {
        let doc = parse_document("---\ntitle: Alpha\n---\n# Heading\n");
        assert_eq!(extract_title(&doc.frontmatter, &doc.body, "a"), "Alpha");
    }

    #[test]
    fn title_falls_back_to_first_h1() {
        let body = "intro\n\n## Sub\n# Beta\n# Gamma";
        assert_eq!(extract_title(&Map::new(), body, "b"), "Beta");
    }

    #[test]
    fn title_ignores_headings_in_code() {
        let body = "```bash\n# install\n```\n# Real ##";
        assert_eq!(extract_title(&Map::new(), body, "x"), "Real");
    }

    #[test]
    fn title_falls_back_to_stem() {
        let mut fm = Map::new();
        fm.insert("title".into(), Value::String("  ".into()));
        fm.insert("sidebar_label".into(), Value::String("Label".into()));
        assert_eq!(extract_title(&fm, "no heading", "setup"), "setup");
    }

    #[test]
    fn non_string_title_is_ignored() {
        let doc = parse_document("---\ntitle: 42\n---\n# Numbers\n");
        assert_eq!(extract_title(&doc.frontmatter, &doc.body, "n"), "Numbers");
    }
}
