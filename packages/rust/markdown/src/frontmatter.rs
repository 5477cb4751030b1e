//! YAML metadata header splitting.
//!
//! A document may open with a `---` delimited YAML mapping. Anything that
//! does not parse as such is not an error: the whole file becomes the body.

use serde_json::{Map, Value};

const DELIM: &str = "---";

/// Outcome of looking for a metadata header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderStatus {
    /// The file does not start with a delimiter.
    Absent,
    /// A header was found and parsed into a mapping.
    Parsed,
    /// A header was attempted but rejected; the file is treated as body.
    Malformed(String),
}

/// A document split into its metadata header and body.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub frontmatter: Map<String, Value>,
    pub body: String,
    pub header: HeaderStatus,
}

impl ParsedDocument {
    fn body_only(raw: &str, header: HeaderStatus) -> Self {
        Self {
            frontmatter: Map::new(),
            body: raw.to_string(),
            header,
        }
    }
}

/// Split `raw` into a metadata mapping and body text.
pub fn parse_document(raw: &str) -> ParsedDocument {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return ParsedDocument::body_only(raw, HeaderStatus::Absent);
    };
    if first.trim_end() != DELIM {
        return ParsedDocument::body_only(raw, HeaderStatus::Absent);
    }

    let header_start = first.len();
    let mut offset = header_start;
    let mut close = None;
    for line in lines {
        if line.trim_end() == DELIM {
            close = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((header_end, body_start)) = close else {
        return ParsedDocument::body_only(
            raw,
            HeaderStatus::Malformed("missing closing delimiter".into()),
        );
    };

    let yaml = &raw[header_start..header_end];
    match parse_yaml_mapping(yaml) {
        Ok(frontmatter) => ParsedDocument {
            frontmatter,
            body: raw[body_start..].to_string(),
            header: HeaderStatus::Parsed,
        },
        Err(reason) => ParsedDocument::body_only(raw, HeaderStatus::Malformed(reason)),
    }
}

fn parse_yaml_mapping(yaml: &str) -> std::result::Result<Map<String, Value>, String> {
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(format!("header is not a mapping: {other}")),
        Err(e) => Err(e.to_string()),
    }
}
