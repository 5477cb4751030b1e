//! Artifact writer.
//!
//! The only component that touches the output directory. Every file is
//! written atomically (temp file, then rename) and fingerprinted with
//! SHA-256. Any I/O failure is returned to the caller.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use agentdocs_artifacts::Artifact;
use agentdocs_shared::{AgentDocsError, Result};

/// Metadata for a single written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMeta {
    /// Path relative to the output root.
    pub path: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Drop artifacts whose path was already claimed by an earlier one.
pub fn dedupe_artifacts(artifacts: Vec<Artifact>) -> Vec<Artifact> {
    let mut seen = HashSet::new();
    artifacts
        .into_iter()
        .filter(|artifact| {
            let fresh = seen.insert(artifact.path.clone());
            if !fresh {
                warn!(path = %artifact.path, "artifact path already written this run, keeping the first");
            }
            fresh
        })
        .collect()
}

/// Write `artifacts` under `out_dir`.
#[instrument(skip_all, fields(out_dir = %out_dir.display(), artifact_count = artifacts.len()))]
pub fn write_artifacts(out_dir: &Path, artifacts: &[Artifact]) -> Result<Vec<ArtifactMeta>> {
    std::fs::create_dir_all(out_dir).map_err(|e| AgentDocsError::io(out_dir, e))?;

    let mut metas = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let target = resolve_target(out_dir, &artifact.path)?;
        write_atomic(&target, &artifact.contents)?;

        let hash = format!("{:x}", Sha256::digest(artifact.contents.as_bytes()));
        debug!(path = %artifact.path, size = artifact.contents.len(), "wrote artifact");

        metas.push(ArtifactMeta {
            path: artifact.path.clone(),
            sha256: hash,
            size_bytes: artifact.contents.len(),
        });
    }

    info!(count = metas.len(), "artifacts written");
    Ok(metas)
}

/// Join a relative artifact path onto `out_dir`, refusing anything that
/// would escape it.
fn resolve_target(out_dir: &Path, rel: &str) -> Result<PathBuf> {
    let rel_path = Path::new(rel);
    let escapes = rel.is_empty()
        || rel_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(AgentDocsError::validation(format!(
            "artifact path `{rel}` must be relative to the output directory"
        )));
    }
    Ok(out_dir.join(rel_path))
}

fn write_atomic(target: &Path, contents: &str) -> Result<()> {
    let parent = target.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| AgentDocsError::io(parent, e))?;

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = parent.join(format!(".{file_name}.tmp"));

    std::fs::write(&temp, contents).map_err(|e| AgentDocsError::io(&temp, e))?;
    std::fs::rename(&temp, target).map_err(|e| AgentDocsError::io(target, e))?;
    Ok(())
}
