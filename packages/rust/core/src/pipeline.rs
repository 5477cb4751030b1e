//! End-to-end export: document root → model → artifacts → output directory.
//!
//! [`post_build`] is the host hook. It runs once per site build, after the
//! static output exists, and either writes every requested artifact or
//! returns the error that should fail the build.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use agentdocs_artifacts::{ExportContent, GenerateContext, generators_for};
use agentdocs_shared::{DocModel, DocsConfig, Result, clean_base_url, normalize_base_url};

use crate::sections::group_sections;
use crate::walker::{WalkOptions, walk_docs};
use crate::writer::{ArtifactMeta, dedupe_artifacts, write_artifacts};

/// What the host passes to the post-build hook.
#[derive(Debug, Clone)]
pub struct PostBuildHook {
    /// Document root to ingest.
    pub docs_dir: PathBuf,
    /// Built site directory; artifacts land here.
    pub out_dir: PathBuf,
    /// Effective base URL of the built site.
    pub base_url: String,
}

/// Summary of one export run.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub documents: usize,
    pub sections: usize,
    pub artifacts: Vec<ArtifactMeta>,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once per artifact after it is on disk.
    fn artifact_written(&self, meta: &ArtifactMeta);
    /// Called when the pipeline completes.
    fn done(&self, report: &ExportReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn artifact_written(&self, _meta: &ArtifactMeta) {}
    fn done(&self, _report: &ExportReport) {}
}

/// Walk `docs_dir` and group the result. Never fails.
#[instrument(skip_all, fields(docs_dir = %docs_dir.display()))]
pub fn build_model(docs_dir: &Path, config: &DocsConfig, base_url: &str) -> DocModel {
    let opts = WalkOptions::from_config(config, base_url);
    let docs = walk_docs(docs_dir, &opts);
    let base_url = normalize_base_url(base_url);
    let sections = group_sections(&docs, &config.sections, clean_base_url(&base_url));
    DocModel { docs, sections }
}

/// Run the full export.
///
/// 1. Resolve the requested generators and static content
/// 2. Build the model from the document root
/// 3. Run every generator over the same model
/// 4. Write all artifacts (first claim on a path wins)
#[instrument(skip_all, fields(docs_dir = %hook.docs_dir.display(), out_dir = %hook.out_dir.display(), base_url = %hook.base_url))]
pub fn post_build(
    config: &DocsConfig,
    hook: &PostBuildHook,
    progress: &dyn ProgressReporter,
) -> Result<ExportReport> {
    let start = Instant::now();

    let generators = generators_for(&config.export.emit)?;
    let content = ExportContent::load(config.export.content_dir.as_deref().map(Path::new))?;

    progress.phase("Reading documents");
    let model = build_model(&hook.docs_dir, config, &hook.base_url);
    info!(
        documents = model.docs.len(),
        sections = model.sections.len(),
        "document model built"
    );

    progress.phase("Generating artifacts");
    let ctx = GenerateContext::new(config, &hook.base_url, content);
    let mut artifacts = Vec::new();
    for generator in &generators {
        let produced = generator.generate(&model, &ctx)?;
        debug!(generator = generator.name(), count = produced.len(), "generated");
        artifacts.extend(produced);
    }
    let artifacts = dedupe_artifacts(artifacts);

    progress.phase("Writing artifacts");
    let metas = write_artifacts(&hook.out_dir, &artifacts)?;
    for meta in &metas {
        progress.artifact_written(meta);
    }

    let report = ExportReport {
        documents: model.docs.len(),
        sections: model.sections.len(),
        artifacts: metas,
        elapsed: start.elapsed(),
    };

    info!(
        documents = report.documents,
        artifacts = report.artifacts.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "export complete"
    );
    progress.done(&report);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use serde_json::Value;

    use agentdocs_markdown::to_anchor;
    use agentdocs_shared::AgentDocsError;

    use super::*;

    struct Site {
        _dir: tempfile::TempDir,
        hook: PostBuildHook,
    }

    fn site(files: &[(&str, &str)], base_url: &str) -> Site {
        let dir = tempfile::tempdir().unwrap();
        let docs_dir = dir.path().join("docs");
        for (rel, contents) in files {
            let path = docs_dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        let hook = PostBuildHook {
            docs_dir,
            out_dir: dir.path().join("build"),
            base_url: base_url.into(),
        };
        Site { _dir: dir, hook }
    }

    fn read(site: &Site, rel: &str) -> String {
        fs::read_to_string(site.hook.out_dir.join(rel)).unwrap()
    }

    fn read_json(site: &Site, rel: &str) -> Value {
        serde_json::from_str(&read(site, rel)).unwrap()
    }

    fn sample_site(base_url: &str) -> Site {
        site(
            &[
                ("guides/a.md", "---\ntitle: Alpha\n---\n[See B](../guides/b.md)\n"),
                ("guides/b.md", "# Beta\n\n:::tip\nDo X\n:::\n"),
                ("intro.md", "# Welcome\n\nimport X from 'y';\n<Callout>Read on</Callout>"),
                (
                    "reference/cli/deploy.md",
                    "# Strata Deploy\n\n## Synopsis\n\n```bash\nstrata deploy\n```\n\n## Description\n\nShips models.\n",
                ),
                ("guides/_category_.json", "{\"label\": \"Guides\"}"),
            ],
            base_url,
        )
    }

    #[test]
    fn guides_scenario_end_to_end() {
        let site = sample_site("/");
        let report = post_build(&DocsConfig::default(), &site.hook, &SilentProgress).unwrap();
        assert_eq!(report.documents, 4);
        assert_eq!(report.sections, 3);

        let llms = read(&site, "llms.txt");
        assert!(llms.contains("[See B](#beta)"));
        assert!(llms.contains("**tip:** Do X"));
        assert!(llms.contains("Read on"));
        assert!(!llms.contains("<Callout>"));
        assert!(!llms.contains("import X"));
        let alpha = llms.find("### Alpha").unwrap();
        let beta = llms.find("### Beta").unwrap();
        assert!(alpha < beta);

        let guides = read_json(&site, "api/guides.json");
        assert_eq!(guides["pages"][0]["title"], "Alpha");
        assert_eq!(guides["pages"][1]["title"], "Beta");
        assert_eq!(guides["relatedLinks"][0]["url"], "/guides/b");

        let commands = read_json(&site, "api/cli/commands.json");
        assert_eq!(commands["commands"][0]["synopsis"], "strata deploy");
        assert_eq!(commands["commands"][0]["description"], "Ships models.");

        let docs_json = read_json(&site, "api/docs.json");
        for object in docs_json["semantic_objects"].as_object().unwrap().values() {
            let schema = object["schema"].as_str().unwrap();
            assert!(site.hook.out_dir.join(schema.trim_start_matches('/')).is_file());
        }
    }

    #[test]
    fn toc_anchors_resolve_to_headings() {
        let site = sample_site("/");
        post_build(&DocsConfig::default(), &site.hook, &SilentProgress).unwrap();
        let llms = read(&site, "llms.txt");

        let (head, body) = llms.split_once("\n---\n").unwrap();
        let headings: Vec<String> = body
            .lines()
            .filter_map(|l| l.strip_prefix("### ").or_else(|| l.strip_prefix("## ")))
            .map(to_anchor)
            .collect();

        let toc = head.split_once("## Table of Contents").unwrap().1;
        for line in toc.lines().filter(|l| l.trim_start().starts_with("- [")) {
            let anchor = line.rsplit_once("](#").unwrap().1.trim_end_matches(')');
            assert!(headings.iter().any(|h| h == anchor), "no heading for {line}");
        }
    }

    #[test]
    fn empty_root_still_yields_well_formed_artifacts() {
        let site = site(&[], "/developer-docs/");
        let report = post_build(&DocsConfig::default(), &site.hook, &SilentProgress).unwrap();
        assert_eq!(report.documents, 0);

        assert!(read(&site, "llms.txt").contains("## Table of Contents"));
        assert_eq!(read_json(&site, "api/sections.json")["sections"], serde_json::json!([]));
        assert_eq!(read_json(&site, "api/cli/commands.json")["commands"], serde_json::json!([]));
        let docs_json = read_json(&site, "api/docs.json");
        assert_eq!(docs_json["full_knowledge"], "/developer-docs/llms.txt");
        assert_eq!(
            read_json(&site, "api/schema/table.json")["$id"],
            "https://strata.do/developer-docs/api/schema/table.json"
        );
    }

    #[test]
    fn api_pages_reach_bundles_but_not_the_knowledge_export() {
        let site = sample_site("/");
        let api_page = site.hook.docs_dir.join("api/x.md");
        fs::create_dir_all(api_page.parent().unwrap()).unwrap();
        fs::write(&api_page, "# Endpoint X\n\nReturns models.").unwrap();

        let report = post_build(&DocsConfig::default(), &site.hook, &SilentProgress).unwrap();
        assert_eq!(report.documents, 5);

        let bundle = read_json(&site, "api/api.json");
        assert_eq!(bundle["title"], "API");
        assert_eq!(bundle["pages"][0]["title"], "Endpoint X");
        assert_eq!(bundle["pages"][0]["url"], "/api/x");

        let index = read_json(&site, "api/sections.json");
        assert!(index["sections"].as_array().unwrap().iter().any(|s| s["id"] == "api"));

        let llms = read(&site, "llms.txt");
        assert!(!llms.contains("Endpoint X"));
        assert!(!llms.contains("Returns models."));
    }

    #[test]
    fn emit_subset_limits_output() {
        let site = sample_site("/");
        let mut config = DocsConfig::default();
        config.export.emit = vec!["knowledge".into()];
        let report = post_build(&config, &site.hook, &SilentProgress).unwrap();
        assert_eq!(report.artifacts.len(), 1);
        assert!(!site.hook.out_dir.join("api").exists());
    }

    #[test]
    fn unknown_emit_target_fails_before_writing() {
        let site = sample_site("/");
        let mut config = DocsConfig::default();
        config.export.emit = vec!["pdf".into()];
        let err = post_build(&config, &site.hook, &SilentProgress).unwrap_err();
        assert!(matches!(err, AgentDocsError::Config { .. }));
        assert!(!site.hook.out_dir.exists());
    }

    #[test]
    fn write_failure_propagates() {
        let site = sample_site("/");
        fs::create_dir_all(site.hook.out_dir.parent().unwrap()).unwrap();
        fs::write(&site.hook.out_dir, "not a directory").unwrap();
        let err = post_build(&DocsConfig::default(), &site.hook, &SilentProgress).unwrap_err();
        assert!(matches!(err, AgentDocsError::Io { .. }));
    }

    #[test]
    fn progress_sees_every_artifact() {
        #[derive(Default)]
        struct Recorder {
            phases: Mutex<Vec<String>>,
            written: Mutex<usize>,
            done: Mutex<bool>,
        }
        impl ProgressReporter for Recorder {
            fn phase(&self, name: &str) {
                self.phases.lock().unwrap().push(name.into());
            }
            fn artifact_written(&self, _meta: &ArtifactMeta) {
                *self.written.lock().unwrap() += 1;
            }
            fn done(&self, _report: &ExportReport) {
                *self.done.lock().unwrap() = true;
            }
        }

        let site = sample_site("/");
        let recorder = Recorder::default();
        let report = post_build(&DocsConfig::default(), &site.hook, &recorder).unwrap();
        assert_eq!(*recorder.written.lock().unwrap(), report.artifacts.len());
        assert_eq!(recorder.phases.lock().unwrap().len(), 3);
        assert!(*recorder.done.lock().unwrap());
    }
}
