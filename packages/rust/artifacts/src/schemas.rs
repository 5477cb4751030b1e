//! Strict JSON Schemas (draft-07) for the semantic object kinds.
//!
//! Bodies are hand-authored domain contracts. The generator only adds the
//! `$schema`/`$id`/`version` header and places each file at
//! [`schema_path`](crate::schema_path).

use serde_json::{Map, Value, json};
use tracing::{debug, instrument, warn};

use agentdocs_shared::{DocModel, ObjectKind, Registry, Result};

use crate::{Artifact, ArtifactGenerator, GenerateContext, schema_path};

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Writes one schema per registered object kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRegistry;

impl ArtifactGenerator for SchemaRegistry {
    fn name(&self) -> &'static str {
        "schemas"
    }

    #[instrument(skip_all, fields(kinds = ctx.registry.objects.len()))]
    fn generate(&self, _model: &DocModel, ctx: &GenerateContext) -> Result<Vec<Artifact>> {
        for kind in &ctx.registry.objects {
            if builtin_schema(&kind.key).is_none() {
                warn!(kind = %kind.key, "no built-in schema for registry kind, skipping");
            }
        }

        published_kinds(&ctx.registry)
            .into_iter()
            .filter_map(|kind| builtin_schema(&kind.key).map(|body| (kind, body)))
            .map(|(kind, body)| {
                let path = schema_path(kind);
                let id = format!("{}{}", ctx.site_url, ctx.public_url(&path));
                debug!(%path, "rendering schema");
                Artifact::json(path, &with_header(&id, &ctx.registry.version, body))
            })
            .collect()
    }
}

/// Registry kinds that have a schema to publish, in registry order.
pub fn published_kinds(registry: &Registry) -> Vec<&ObjectKind> {
    registry
        .objects
        .iter()
        .filter(|kind| builtin_schema(&kind.key).is_some())
        .collect()
}

fn with_header(id: &str, version: &str, body: Value) -> Value {
    let mut schema = Map::new();
    schema.insert("$schema".into(), Value::String(DRAFT_07.into()));
    schema.insert("$id".into(), Value::String(id.into()));
    schema.insert("version".into(), Value::String(version.into()));
    if let Value::Object(body) = body {
        schema.extend(body);
    }
    Value::Object(schema)
}

/// Schema body for a built-in kind, without the header.
pub fn builtin_schema(key: &str) -> Option<Value> {
    let body = match key {
        "table" => table_schema(),
        "relation" => relation_schema(),
        "project" => project_schema(),
        "datasources" => datasources_schema(),
        "migration" => migration_schema(),
        "test" => test_schema(),
        _ => return None,
    };
    Some(body)
}

// ---------------------------------------------------------------------------
// Schema bodies
// ---------------------------------------------------------------------------

fn table_schema() -> Value {
    json!({
        "type": "object",
        "required": ["datasource", "name", "physical_name", "cost", "fields"],
        "additionalProperties": false,
        "properties": {
            "datasource": { "type": "string" },
            "name": { "type": "string" },
            "physical_name": { "type": "string" },
            "cost": { "type": "integer", "minimum": 1 },
            "snapshot_date": { "type": "string" },
            "tags": { "type": "array", "items": { "type": "string" } },
            "partitions": {
                "type": "array",
                "items": { "$ref": "#/definitions/partition" }
            },
            "imports": { "type": "array", "items": { "type": "string" } },
            "fields": {
                "type": "array",
                "items": { "$ref": "#/definitions/field" },
                "minItems": 1
            }
        },
        "definitions": {
            "partition": {
                "type": "object",
                "required": ["dimension", "predicate", "filter_value"],
                "additionalProperties": false,
                "properties": {
                    "dimension": { "type": "string" },
                    "predicate": { "enum": ["between", "in_list"] },
                    "filter_value": { "type": "string" },
                    "filter_value_end": { "type": "string" },
                    "description": { "type": "string" }
                }
            },
            "field": {
                "type": "object",
                "required": ["type", "name", "data_type", "expression"],
                "additionalProperties": false,
                "properties": {
                    "type": { "enum": ["dimension", "measure"] },
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "data_type": {
                        "enum": [
                            "string", "integer", "bigint", "decimal",
                            "date", "date_time", "boolean", "binary"
                        ]
                    },
                    "hidden": { "type": "boolean", "default": false },
                    "display_type": {
                        "enum": ["default", "html", "url", "email", "phone_number", "image"],
                        "default": "default"
                    },
                    "formatter": { "type": "string" },
                    "disable_value_listing": { "type": "boolean", "default": false },
                    "value_list_size": { "type": "integer", "minimum": 1 },
                    "grains": { "type": "array", "items": { "type": "string" } },
                    "expression": { "$ref": "#/definitions/expression" }
                }
            },
            "expression": {
                "type": "object",
                "required": ["sql"],
                "additionalProperties": false,
                "properties": {
                    "sql": { "type": "string" },
                    "primary_key": { "type": "boolean", "default": false },
                    "lookup": { "type": "boolean", "default": false },
                    "array": { "type": "boolean", "default": false }
                }
            }
        }
    })
}

fn relation_schema() -> Value {
    json!({
        "type": "object",
        "required": ["datasource"],
        "properties": {
            "datasource": { "type": "string" }
        },
        "additionalProperties": {
            "type": "object",
            "required": ["left", "right", "sql", "cardinality"],
            "additionalProperties": false,
            "properties": {
                "left": { "type": "string" },
                "right": { "type": "string" },
                "sql": { "type": "string" },
                "cardinality": { "enum": ["one_to_one", "one_to_many", "many_to_one"] },
                "join": { "enum": ["inner", "left", "right"], "default": "inner" },
                "allow_measure_expansion": { "type": "boolean", "default": false }
            }
        }
    })
}

fn project_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "server"],
        "additionalProperties": false,
        "properties": {
            "name": { "type": "string" },
            "description": { "type": "string" },
            "uid": { "type": "string" },
            "server": { "type": "string", "format": "uri" },
            "production_branch": { "type": "string", "default": "main" },
            "git": { "type": "string" },
            "project_id": { "type": "integer" },
            "environments": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "properties": {
                        "server": { "type": "string", "format": "uri" },
                        "api_key": { "type": "string" }
                    }
                }
            }
        }
    })
}

fn datasources_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": {
            "type": "object",
            "required": ["adapter"],
            "properties": {
                "adapter": {
                    "enum": [
                        "postgres", "snowflake", "mysql", "sqlserver",
                        "athena", "trino", "duckdb", "druid"
                    ]
                },
                "host": { "type": "string" },
                "port": { "type": "integer" },
                "database": { "type": "string" },
                "schema": { "type": "string" },
                "warehouse": { "type": "string" },
                "account": { "type": "string" },
                "catalog": { "type": "string" },
                "region": { "type": "string" },
                "workgroup": { "type": "string" },
                "s3_output_location": { "type": "string" },
                "ssl": { "type": "boolean", "default": false },
                "tier": { "enum": ["hot", "warm", "cold"], "default": "hot" }
            }
        }
    })
}

fn migration_schema() -> Value {
    let rename = |op: &str| {
        json!({
            "required": ["type", "from", "to"],
            "properties": {
                "type": { "const": op },
                "from": { "type": "string" },
                "to": { "type": "string" }
            }
        })
    };

    json!({
        "type": "object",
        "required": ["version", "operations"],
        "additionalProperties": false,
        "properties": {
            "version": { "type": "string" },
            "description": { "type": "string" },
            "operations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "oneOf": [
                        rename("rename_field"),
                        rename("rename_table"),
                        {
                            "required": ["type", "field_a", "field_b"],
                            "properties": {
                                "type": { "const": "swap_fields" },
                                "field_a": { "type": "string" },
                                "field_b": { "type": "string" }
                            }
                        }
                    ]
                },
                "minItems": 1
            }
        }
    })
}

fn test_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "query"],
        "additionalProperties": false,
        "properties": {
            "name": { "type": "string" },
            "description": { "type": "string" },
            "query": {
                "type": "object",
                "required": ["dimensions", "measures"],
                "additionalProperties": false,
                "properties": {
                    "dimensions": { "type": "array", "items": { "type": "string" } },
                    "measures": { "type": "array", "items": { "type": "string" } },
                    "filters": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["field", "operator", "value"],
                            "properties": {
                                "field": { "type": "string" },
                                "operator": {
                                    "enum": [
                                        "equals", "not_equals", "greater_than",
                                        "less_than", "contains", "in"
                                    ]
                                },
                                "value": {}
                            }
                        }
                    }
                }
            },
            "assert_sql": { "type": "string" },
            "assert_row_count": { "type": "integer", "minimum": 0 }
        }
    })
}
