//! Machine discovery index (`api/docs.json`).

use serde_json::{Map, Value, json};
use tracing::instrument;

use agentdocs_shared::{DocModel, Result};

use crate::schemas::published_kinds;
use crate::{API_DIR, Artifact, ArtifactGenerator, GenerateContext, KNOWLEDGE_PATH, schema_path};

/// Writes the registry of object kinds, commands and constraints.
///
/// Content comes from the injected registry, not from the documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryIndex;

impl DiscoveryIndex {
    pub const PATH: &'static str = "docs.json";
}

impl ArtifactGenerator for DiscoveryIndex {
    fn name(&self) -> &'static str {
        "discovery"
    }

    #[instrument(skip_all)]
    fn generate(&self, _model: &DocModel, ctx: &GenerateContext) -> Result<Vec<Artifact>> {
        let registry = &ctx.registry;
        let mut index = Map::new();

        index.insert("version".into(), json!(registry.version));
        index.insert(
            format!("{}_version_compatibility", registry.product),
            json!(registry.version_compatibility),
        );

        let objects: Map<String, Value> = published_kinds(registry)
            .into_iter()
            .map(|kind| {
                let entry = json!({
                    "schema": ctx.public_url(&schema_path(kind)),
                    "file_pattern": kind.file_pattern,
                    "description": kind.description,
                });
                (kind.key.clone(), entry)
            })
            .collect();
        index.insert("semantic_objects".into(), Value::Object(objects));

        let commands: Map<String, Value> = registry
            .cli_commands
            .iter()
            .map(|cmd| (cmd.command.clone(), json!(cmd.description)))
            .collect();
        index.insert("cli_commands".into(), Value::Object(commands));

        index.insert(
            "critical_constraints".into(),
            json!(registry.critical_constraints),
        );
        index.insert(
            "full_knowledge".into(),
            json!(ctx.public_url(KNOWLEDGE_PATH)),
        );

        let path = format!("{API_DIR}/{}", Self::PATH);
        Ok(vec![Artifact::json(path, &Value::Object(index))?])
    }
}
