//! Static discovery registry: known object kinds, CLI commands, and
//! critical constraints published in `api/docs.json`.
//!
//! The built-in [`Registry::default`] describes the Strata semantic layer.
//! Projects can replace it through the `[registry]` table in `agentdocs.toml`.

use serde::{Deserialize, Serialize};

/// Registry content injected into the discovery-index generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    /// Product slug, used for the `<product>_version_compatibility` key.
    pub product: String,
    /// Discovery index format version.
    pub version: String,
    /// Compatible product version range.
    pub version_compatibility: String,
    /// Known semantic object kinds, in publication order.
    pub objects: Vec<ObjectKind>,
    /// CLI command registry, in publication order.
    pub cli_commands: Vec<CliCommand>,
    /// Invariants every generated model must respect.
    pub critical_constraints: Vec<String>,
}

/// One semantic object kind with its schema and file naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectKind {
    /// Registry key; also names the schema file (`<key>.json`).
    pub key: String,
    /// Glob matching files of this kind in a project.
    pub file_pattern: String,
    /// Human description.
    pub description: String,
}

impl ObjectKind {
    /// File name of this kind's schema under the schema directory.
    pub fn schema_file_name(&self) -> String {
        format!("{}.json", self.key)
    }
}

/// A CLI invocation and what it does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliCommand {
    pub command: String,
    pub description: String,
}

impl Default for Registry {
    fn default() -> Self {
        let objects = [
            (
                "table",
                "tbl.*.yml",
                "Semantic table definition with dimensions and measures",
            ),
            (
                "relation",
                "rel.*.yml",
                "Table relationships and join definitions",
            ),
            (
                "project",
                "project.yml",
                "Project configuration and server connection",
            ),
            (
                "datasources",
                "datasources.yml",
                "Database connection configurations",
            ),
            (
                "migration",
                "migrations/*.yml",
                "Schema migration for renaming/swapping",
            ),
            ("test", "tests/*.yml", "Query validation test definitions"),
        ]
        .into_iter()
        .map(|(key, file_pattern, description)| ObjectKind {
            key: key.into(),
            file_pattern: file_pattern.into(),
            description: description.into(),
        })
        .collect();

        let cli_commands = [
            ("strata init", "Initialize new Strata project in current directory"),
            ("strata datasource add <name>", "Add and configure a database connection"),
            ("strata datasource test <name>", "Test database connection"),
            ("strata datasource list", "List configured datasources"),
            ("strata table create <name>", "Generate table YAML from database introspection"),
            ("strata relation create <name>", "Generate relation YAML template"),
            ("strata audit", "Validate semantic model (syntax + semantics)"),
            ("strata audit syntax", "Check YAML syntax only"),
            ("strata audit models", "Validate model semantics only"),
            ("strata deploy", "Deploy semantic model to Strata server"),
            ("strata deploy --dry-run", "Preview deployment without applying"),
            ("strata test", "Run query validation tests"),
            ("strata migration create", "Create a migration file for renaming"),
        ]
        .into_iter()
        .map(|(command, description)| CliCommand {
            command: command.into(),
            description: description.into(),
        })
        .collect();

        let critical_constraints = [
            "Field names must be globally unique across entire semantic layer",
            "No many_to_many relationships - use junction tables instead",
            "Measures must include aggregation function (sum, count, avg, min, max)",
            "Dimensions must NOT include aggregation functions",
            "Every table requires: datasource, name, physical_name, cost, fields",
            "Every field requires: type, name, data_type, expression",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            product: "strata".into(),
            version: "1.0".into(),
            version_compatibility: ">=0.9.0".into(),
            objects,
            cli_commands,
            critical_constraints,
        }
    }
}
