//! Flattened knowledge export (`llms.txt`).
//!
//! Layout:
//! ```text
//! <preamble>
//! <rules>
//! ## Table of Contents
//! ---
//! ## <section title>
//! ### <item title>
//! <resolved, sanitized content>
//! ---
//! ## <appendix title>
//! <appendix body>
//! ```
//! Table-of-contents links and headings share [`to_anchor`].

use tracing::{debug, instrument};

use agentdocs_markdown::{LinkResolver, sanitize, to_anchor};
use agentdocs_shared::{DocFile, DocModel, Result, Section};

use crate::{Artifact, ArtifactGenerator, GenerateContext, KNOWLEDGE_PATH};

/// Writes the single-file knowledge export.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnowledgeExport;

impl ArtifactGenerator for KnowledgeExport {
    fn name(&self) -> &'static str {
        "knowledge"
    }

    #[instrument(skip_all, fields(sections = model.sections.len()))]
    fn generate(&self, model: &DocModel, ctx: &GenerateContext) -> Result<Vec<Artifact>> {
        let text = render(model, ctx);
        debug!(bytes = text.len(), "rendered knowledge export");
        Ok(vec![Artifact::text(KNOWLEDGE_PATH, text)])
    }
}

fn render(model: &DocModel, ctx: &GenerateContext) -> String {
    let sections = included_sections(model, &ctx.knowledge_exclude_dirs);

    // Index pages have no heading of their own; links land on the section.
    let resolver = LinkResolver::from_routes(
        sections.iter().flat_map(|(section, items)| {
            items.iter().map(move |item| {
                let heading = if item.is_index() {
                    &section.title
                } else {
                    &item.title
                };
                (item.route().to_string(), heading.clone())
            })
        }),
        ctx.links.clone(),
    );

    let content = &ctx.content;
    let mut lines: Vec<String> = Vec::new();

    lines.push(content.preamble.clone());
    lines.push(String::new());
    if !content.rules.is_empty() {
        lines.push(content.rules.clone());
        lines.push(String::new());
    }

    lines.push("## Table of Contents".into());
    lines.push(String::new());
    for (section, items) in &sections {
        lines.push(toc_entry(&section.title, 0));
        for item in items.iter().filter(|item| !item.is_index()) {
            lines.push(toc_entry(&item.title, 1));
        }
    }
    for appendix in &content.appendices {
        lines.push(toc_entry(&appendix.title, 0));
    }
    lines.push(String::new());

    for (section, items) in &sections {
        lines.push("---".into());
        lines.push(String::new());
        lines.push(format!("## {}", section.title));
        lines.push(String::new());

        for item in items {
            if !item.is_index() {
                lines.push(format!("### {}", item.title));
                lines.push(String::new());
            }
            let resolved = resolver.resolve_anchors(&item.content);
            lines.push(sanitize(&resolved));
            lines.push(String::new());
        }
    }

    for appendix in &content.appendices {
        lines.push("---".into());
        lines.push(String::new());
        lines.push(format!("## {}", appendix.title));
        lines.push(String::new());
        lines.push(appendix.body.clone());
        lines.push(String::new());
    }

    let mut text = lines.join("\n");
    let trimmed = text.trim_end().len();
    text.truncate(trimmed);
    text.push('\n');
    text
}

/// Sections with the documents that belong in the export. Sections left
/// empty by the exclusion are dropped.
fn included_sections<'a>(
    model: &'a DocModel,
    exclude_dirs: &[String],
) -> Vec<(&'a Section, Vec<&'a DocFile>)> {
    model
        .sections
        .iter()
        .filter_map(|section| {
            let items: Vec<&DocFile> = section
                .items
                .iter()
                .filter(|item| !in_excluded_dir(&item.path, exclude_dirs))
                .collect();
            (!items.is_empty()).then_some((section, items))
        })
        .collect()
}

fn in_excluded_dir(path: &str, exclude_dirs: &[String]) -> bool {
    path.rsplit_once('/').is_some_and(|(dir, _)| {
        dir.split('/')
            .any(|segment| exclude_dirs.iter().any(|d| d == segment))
    })
}

fn toc_entry(title: &str, depth: usize) -> String {
    format!("{}- [{title}](#{})", "  ".repeat(depth), to_anchor(title))
}
