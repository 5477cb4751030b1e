//! Static text blocks injected into the knowledge export.
//!
//! Built-in copies ship with the crate. A content directory may replace any
//! of them file by file.

use std::path::Path;

use tracing::debug;

use agentdocs_shared::{AgentDocsError, Result};

const PREAMBLE_FILE: &str = "preamble.md";
const RULES_FILE: &str = "rules.md";
const EXAMPLES_FILE: &str = "examples.md";
const MISTAKES_FILE: &str = "mistakes.md";

const DEFAULT_PREAMBLE: &str = include_str!("../content/preamble.md");
const DEFAULT_RULES: &str = include_str!("../content/rules.md");
const DEFAULT_EXAMPLES: &str = include_str!("../content/examples.md");
const DEFAULT_MISTAKES: &str = include_str!("../content/mistakes.md");

/// A titled block appended after the document sections and listed in the
/// table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appendix {
    pub title: String,
    pub body: String,
}

impl Appendix {
    /// Build from markdown text. A leading `## ` heading supplies the title;
    /// otherwise `default_title` is used and the whole text is the body.
    pub fn from_markdown(default_title: &str, text: &str) -> Self {
        let text = text.trim();
        let (first, rest) = text.split_once('\n').unwrap_or((text, ""));

        match first.strip_prefix("## ") {
            Some(title) if !title.trim().is_empty() => Self {
                title: title.trim().to_string(),
                body: rest.trim().to_string(),
            },
            _ => Self {
                title: default_title.to_string(),
                body: text.to_string(),
            },
        }
    }
}

/// Verbatim blocks of the knowledge export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportContent {
    /// Title heading, summary quote and intro paragraph.
    pub preamble: String,
    /// Rules block placed before the table of contents.
    pub rules: String,
    /// Trailing blocks (canonical examples, common mistakes).
    pub appendices: Vec<Appendix>,
}

impl Default for ExportContent {
    fn default() -> Self {
        Self::from_texts(
            DEFAULT_PREAMBLE,
            DEFAULT_RULES,
            DEFAULT_EXAMPLES,
            DEFAULT_MISTAKES,
        )
    }
}

impl ExportContent {
    fn from_texts(preamble: &str, rules: &str, examples: &str, mistakes: &str) -> Self {
        Self {
            preamble: preamble.trim().to_string(),
            rules: rules.trim().to_string(),
            appendices: vec![
                Appendix::from_markdown("Canonical YAML Examples", examples),
                Appendix::from_markdown("Common Mistakes to Avoid", mistakes),
            ],
        }
    }

    /// Load content from `dir`, falling back to the built-in copy for each
    /// file that is absent. A missing directory is a config error.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let Some(dir) = dir else {
            return Ok(Self::default());
        };

        if !dir.is_dir() {
            return Err(AgentDocsError::config(format!(
                "content directory {} does not exist",
                dir.display()
            )));
        }

        let preamble = read_or(dir, PREAMBLE_FILE, DEFAULT_PREAMBLE)?;
        let rules = read_or(dir, RULES_FILE, DEFAULT_RULES)?;
        let examples = read_or(dir, EXAMPLES_FILE, DEFAULT_EXAMPLES)?;
        let mistakes = read_or(dir, MISTAKES_FILE, DEFAULT_MISTAKES)?;

        Ok(Self::from_texts(&preamble, &rules, &examples, &mistakes))
    }
}

fn read_or(dir: &Path, name: &str, fallback: &str) -> Result<String> {
    let path = dir.join(name);
    if !path.exists() {
        debug!(file = name, "using built-in content");
        return Ok(fallback.to_string());
    }
    debug!(path = %path.display(), "loading content override");
    std::fs::read_to_string(&path).map_err(|e| AgentDocsError::io(&path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_titled_appendices() {
        let content = ExportContent::default();
        assert!(content.preamble.starts_with("# Strata Semantic Modeling Reference"));
        assert!(content.rules.starts_with("## "));
        let titles: Vec<_> = content.appendices.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Canonical YAML Examples", "Common Mistakes to Avoid"]);
        assert!(!content.appendices[0].body.starts_with("## "));
    }

    #[test]
    fn appendix_without_heading_uses_default_title() {
        let appendix = Appendix::from_markdown("Examples", "\n- one\n- two\n");
        assert_eq!(appendix.title, "Examples");
        assert_eq!(appendix.body, "- one\n- two");
    }

    #[test]
    fn content_dir_overrides_per_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(RULES_FILE), "## House Rules\n\nBe kind.\n").unwrap();
        std::fs::write(dir.path().join(MISTAKES_FILE), "## Pitfalls\n\n- none\n").unwrap();

        let content = ExportContent::load(Some(dir.path())).expect("load");
        assert_eq!(content.rules, "## House Rules\n\nBe kind.");
        assert_eq!(content.appendices[0], ExportContent::default().appendices[0]);
        assert_eq!(content.appendices[1].title, "Pitfalls");
        assert_eq!(content.appendices[1].body, "- none");
    }

    #[test]
    fn missing_content_dir_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ExportContent::load(Some(&dir.path().join("nope"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
