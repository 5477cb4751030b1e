//! CLI command metadata extraction for `api/cli/commands.json`.
//!
//! Extraction is best-effort. It sits behind [`CommandExtractor`] so a
//! stricter convention can replace the heading-based one.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use agentdocs_shared::{CommandsConfig, DocFile};

/// Pulls structured blocks out of a command reference page.
pub trait CommandExtractor {
    /// Usage line(s) of the command.
    fn synopsis(&self, content: &str) -> Option<String>;

    /// Prose description of the command.
    fn description(&self, content: &str) -> Option<String>;
}

/// Reads `## Synopsis` (first fenced `bash` block) and `## Description`
/// (text up to the next heading or fence).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingExtractor;

impl CommandExtractor for HeadingExtractor {
    fn synopsis(&self, content: &str) -> Option<String> {
        static SYNOPSIS_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"(?s)## Synopsis\s+```bash\s+(.+?)\s+```").expect("valid regex")
        });

        SYNOPSIS_RE
            .captures(content)
            .map(|caps| caps[1].trim().to_string())
    }

    fn description(&self, content: &str) -> Option<String> {
        static DESCRIPTION_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"## Description\s+").expect("valid regex"));

        let start = DESCRIPTION_RE.find(content)?.end();
        let rest = &content[start..];
        let end = [rest.find("\n##"), rest.find("\n```")]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(rest.len());
        Some(rest[..end].trim().to_string())
    }
}

/// One entry of `api/cli/commands.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandEntry {
    pub id: String,
    pub command: String,
    pub title: String,
    pub url: String,
    pub synopsis: String,
    pub description: String,
}

/// Title lowercased with whitespace runs replaced by `-`.
pub fn command_slug(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Whether `doc` is a command reference page.
pub fn is_command_page(doc: &DocFile, config: &CommandsConfig) -> bool {
    doc.section == config.section && doc.path.contains(config.path_marker.as_str())
}

/// Extract command entries from reference pages, in document order.
///
/// Missing blocks become empty strings.
pub fn extract_commands(
    docs: &[DocFile],
    config: &CommandsConfig,
    extractor: &dyn CommandExtractor,
) -> Vec<CommandEntry> {
    docs.iter()
        .filter(|doc| is_command_page(doc, config))
        .map(|doc| {
            let synopsis = extractor.synopsis(&doc.content);
            let description = extractor.description(&doc.content);
            if synopsis.is_none() || description.is_none() {
                debug!(path = %doc.path, "command page is missing synopsis or description");
            }
            CommandEntry {
                id: doc.id.clone(),
                command: command_slug(&doc.title),
                title: doc.title.clone(),
                url: doc.url.clone(),
                synopsis: synopsis.unwrap_or_default(),
                description: description.unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::doc;

    const DEPLOY: &str = "# strata deploy\n\n## Synopsis\n\n```bash\nstrata deploy [--dry-run]\n```\n\n## Description\n\nDeploys the semantic model.\nRuns an audit first.\n\n## Options\n\n- `--dry-run`";

    #[test]
    fn extracts_synopsis_and_description() {
        assert_eq!(
            HeadingExtractor.synopsis(DEPLOY).as_deref(),
            Some("strata deploy [--dry-run]")
        );
        assert_eq!(
            HeadingExtractor.description(DEPLOY).as_deref(),
            Some("Deploys the semantic model.\nRuns an audit first.")
        );
    }

    #[test]
    fn description_stops_at_fence() {
        let content = "## Description\nSee below.\n```bash\nx\n```";
        assert_eq!(HeadingExtractor.description(content).as_deref(), Some("See below."));
    }

    #[test]
    fn missing_blocks_yield_none() {
        assert_eq!(HeadingExtractor.synopsis("## Synopsis\n\nno fence"), None);
        assert_eq!(HeadingExtractor.description("# Title only"), None);
    }

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(command_slug("Strata  Table\tCreate"), "strata-table-create");
        assert_eq!(command_slug(" Audit "), "audit");
    }

    #[test]
    fn only_reference_cli_pages_are_extracted() {
        let docs = vec![
            doc("guides/cli/intro.md", "Intro", DEPLOY),
            doc("reference/cli/deploy.md", "Strata Deploy", DEPLOY),
            doc("reference/cli/init.md", "Strata Init", "No blocks here."),
            doc("reference/config.md", "Config", DEPLOY),
        ];
        let entries = extract_commands(&docs, &CommandsConfig::default(), &HeadingExtractor);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "deploy");
        assert_eq!(entries[0].command, "strata-deploy");
        assert_eq!(entries[0].url, "/reference/cli/deploy");
        assert_eq!(entries[0].synopsis, "strata deploy [--dry-run]");
        assert_eq!(entries[1].synopsis, "");
        assert_eq!(entries[1].description, "");
    }
}
