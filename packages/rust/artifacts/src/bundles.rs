//! Per-section JSON bundles, the section index and CLI command metadata.
//!
//! Output (relative to the output root):
//! - `api/sections.json`
//! - `api/cli/commands.json`
//! - `api/<section id>.json`, one per section

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, instrument};

use agentdocs_markdown::{LinkResolver, RelatedLink, sanitize};
use agentdocs_shared::{DocModel, Result, Section};

use crate::commands::{CommandEntry, CommandExtractor, HeadingExtractor, extract_commands};
use crate::{API_DIR, Artifact, ArtifactGenerator, GenerateContext};

/// Writes one bundle per section plus the section index and command list.
pub struct SectionBundles {
    extractor: Box<dyn CommandExtractor>,
}

impl Default for SectionBundles {
    fn default() -> Self {
        Self::with_extractor(HeadingExtractor)
    }
}

impl SectionBundles {
    /// Use a different command metadata extractor.
    pub fn with_extractor(extractor: impl CommandExtractor + 'static) -> Self {
        Self {
            extractor: Box::new(extractor),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SectionIndex<'a> {
    sections: Vec<SectionSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct SectionSummary<'a> {
    id: &'a str,
    title: &'a str,
    url: &'a str,
    items: Vec<PageRef<'a>>,
}

#[derive(Debug, Serialize)]
struct PageRef<'a> {
    id: &'a str,
    title: &'a str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct CommandList {
    commands: Vec<CommandEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionBundle<'a> {
    title: &'a str,
    content: String,
    pages: Vec<Page<'a>>,
    related_links: Vec<RelatedLink>,
}

#[derive(Debug, Serialize)]
struct Page<'a> {
    id: &'a str,
    title: &'a str,
    url: &'a str,
    content: String,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

impl ArtifactGenerator for SectionBundles {
    fn name(&self) -> &'static str {
        "bundles"
    }

    #[instrument(skip_all, fields(sections = model.sections.len()))]
    fn generate(&self, model: &DocModel, ctx: &GenerateContext) -> Result<Vec<Artifact>> {
        let resolver = LinkResolver::new(&model.docs, ctx.links.clone());
        let mut artifacts = Vec::with_capacity(model.sections.len() + 2);

        artifacts.push(Artifact::json(
            format!("{API_DIR}/sections.json"),
            &section_index(model),
        )?);

        let commands = extract_commands(&model.docs, &ctx.commands, self.extractor.as_ref());
        debug!(commands = commands.len(), "extracted command metadata");
        artifacts.push(Artifact::json(
            format!("{API_DIR}/cli/commands.json"),
            &CommandList { commands },
        )?);

        for section in &model.sections {
            let bundle = section_bundle(section, &resolver);
            artifacts.push(Artifact::json(
                format!("{API_DIR}/{}.json", section.id),
                &bundle,
            )?);
        }

        Ok(artifacts)
    }
}

fn section_index(model: &DocModel) -> SectionIndex<'_> {
    SectionIndex {
        sections: model
            .sections
            .iter()
            .map(|section| SectionSummary {
                id: &section.id,
                title: &section.title,
                url: &section.url,
                items: section
                    .items
                    .iter()
                    .map(|item| PageRef {
                        id: &item.id,
                        title: &item.title,
                        url: &item.url,
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn section_bundle<'a>(section: &'a Section, resolver: &LinkResolver) -> SectionBundle<'a> {
    let pages: Vec<Page<'a>> = section
        .items
        .iter()
        .map(|item| Page {
            id: &item.id,
            title: &item.title,
            url: &item.url,
            content: sanitize(&resolver.resolve_absolute(&item.content, &item.url)),
        })
        .collect();

    let mut seen = HashSet::new();
    let related_links = section
        .items
        .iter()
        .flat_map(|item| resolver.related_links(&item.content, &item.url))
        .filter(|link| seen.insert(link.clone()))
        .collect();

    SectionBundle {
        title: &section.title,
        content: pages
            .iter()
            .map(|page| page.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"),
        pages,
        related_links,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::test_support::{context, doc, model};

    fn generate(model: &DocModel) -> Vec<(String, Value)> {
        SectionBundles::default()
            .generate(model, &context())
            .expect("generate")
            .into_iter()
            .map(|a| (a.path, serde_json::from_str(&a.contents).expect("valid json")))
            .collect()
    }

    fn sample() -> DocModel {
        model(&[
            (
                "guides",
                "Guides",
                vec![
                    doc("guides/a.md", "Alpha", "Read [B](./b.md) and [B](./b.md).\n<Note>x</Note>"),
                    doc("guides/b.md", "Beta", "Back to [A](../guides/a.md) or [ext](https://x.dev)."),
                ],
            ),
            (
                "reference",
                "Reference",
                vec![doc(
                    "reference/cli/audit.md",
                    "Strata Audit",
                    "## Synopsis\n\n```bash\nstrata audit\n```\n\n## Description\n\nValidates models.",
                )],
            ),
        ])
    }

    #[test]
    fn writes_index_commands_and_one_bundle_per_section() {
        let out = generate(&sample());
        let paths: Vec<_> = out.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            [
                "api/sections.json",
                "api/cli/commands.json",
                "api/guides.json",
                "api/reference.json",
            ]
        );
    }

    #[test]
    fn bundle_resolves_links_and_dedupes_related() {
        let out = generate(&sample());
        let (_, guides) = &out[2];
        let keys: Vec<_> = guides.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["title", "content", "pages", "relatedLinks"]);

        assert_eq!(guides["title"], "Guides");
        assert_eq!(guides["pages"][0]["content"], "Read [B](/guides/b) and [B](/guides/b).\nx");
        assert_eq!(
            guides["content"],
            format!(
                "{}\n\n{}",
                guides["pages"][0]["content"].as_str().unwrap(),
                guides["pages"][1]["content"].as_str().unwrap()
            )
        );
        assert_eq!(
            guides["relatedLinks"],
            serde_json::json!([
                { "title": "B", "url": "/guides/b" },
                { "title": "A", "url": "/guides/a" }
            ])
        );
    }

    #[test]
    fn commands_come_from_reference_pages() {
        let out = generate(&sample());
        let (_, commands) = &out[1];
        let entry = &commands["commands"][0];
        assert_eq!(entry["command"], "strata-audit");
        assert_eq!(entry["synopsis"], "strata audit");
        assert_eq!(entry["description"], "Validates models.");
        assert_eq!(commands["commands"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn section_index_lists_items() {
        let out = generate(&sample());
        let (_, index) = &out[0];
        assert_eq!(index["sections"][0]["id"], "guides");
        assert_eq!(index["sections"][0]["items"][1]["url"], "/guides/b");
    }

    #[test]
    fn empty_model_yields_empty_index_and_commands() {
        let out = generate(&DocModel::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].1["sections"], serde_json::json!([]));
        assert_eq!(out[1].1["commands"], serde_json::json!([]));
    }
}
