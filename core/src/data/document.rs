//! Loading parameter documents.
//!
//! The YAML text is parsed with `serde_yaml` and converted into a
//! `ConfigMap` in one pass. Every shape the flattener cannot handle
//! (sequences, floats, nulls, tagged values, non-string keys) is rejected
//! here with the slash-joined location of the offending node.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::info;

use crate::error::InputError;
use crate::types::node::{ConfigMap, ConfigNode};


/// Read and parse a document from disk.
pub fn load(path: &Path) -> Result<ConfigMap, InputError> {
    info!("loading parameters from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Parse a document from YAML text. An empty document is an empty mapping.
pub fn parse(content: &str) -> Result<ConfigMap, InputError> {
    let value: Value = serde_yaml::from_str(content)?;
    match value {
        Value::Mapping(mapping) => convert_mapping("", mapping),
        Value::Null => Ok(Vec::new()),
        other => Err(InputError::UnsupportedNode {
            path: String::new(),
            kind: value_kind(&other),
        }),
    }
}


fn convert(path: &str, value: Value) -> Result<ConfigNode, InputError> {
    match value {
        Value::Bool(b) => Ok(ConfigNode::Bool(b)),
        Value::Number(n) => n.as_i64().map(ConfigNode::Int).ok_or_else(|| {
            InputError::UnsupportedNode {
                path: path.to_string(),
                kind: if n.is_f64() { "float" } else { "out-of-range integer" },
            }
        }),
        Value::String(s) => Ok(ConfigNode::Str(s)),
        Value::Mapping(mapping) => Ok(ConfigNode::Map(convert_mapping(path, mapping)?)),
        other => Err(InputError::UnsupportedNode {
            path: path.to_string(),
            kind: value_kind(&other),
        }),
    }
}

fn convert_mapping(path: &str, mapping: Mapping) -> Result<ConfigMap, InputError> {
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = match key {
            Value::String(s) => s,
            other => {
                return Err(InputError::NonStringKey {
                    path: path.to_string(),
                    key: render_key(&other),
                })
            }
        };
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{}/{}", path, key)
        };
        let node = convert(&child_path, value)?;
        entries.push((key, node));
    }
    Ok(entries)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => value_kind(other).to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_nested_scalars_in_order() {
        let doc = parse(
            concat!(
                "db:\n  password:\n    type: secure\n    length: 20\n    version: 1\n",
                "  host: localhost\nfeature_enabled: true\nretries: 3\n",
            ),
        )
        .unwrap();
        let keys: Vec<&str> = doc.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["db", "feature_enabled", "retries"]);
        assert_eq!(doc[1].1, ConfigNode::Bool(true));
        assert_eq!(doc[2].1, ConfigNode::Int(3));

        let db = &doc[0].1;
        assert_eq!(db.get("host"), Some(&ConfigNode::Str("localhost".into())));
        assert!(db.get("password").unwrap().is_descriptor());
    }

    #[test]
    fn empty_document_is_empty_map() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn sequence_is_rejected_with_location() {
        let err = parse("a:\n  b:\n    - 1\n    - 2\n").unwrap_err();
        match err {
            InputError::UnsupportedNode { path, kind } => {
                assert_eq!(path, "a/b");
                assert_eq!(kind, "sequence");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn float_and_null_are_rejected() {
        assert!(matches!(
            parse("ratio: 0.5\n"),
            Err(InputError::UnsupportedNode { kind: "float", .. })
        ));
        assert!(matches!(
            parse("nothing: ~\n"),
            Err(InputError::UnsupportedNode { kind: "null", .. })
        ));
    }

    #[test]
    fn non_string_key_is_rejected() {
        let err = parse("a:\n  1: one\n").unwrap_err();
        match err {
            InputError::NonStringKey { path, key } => {
                assert_eq!(path, "a");
                assert_eq!(key, "1");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn top_level_must_be_mapping() {
        assert!(matches!(
            parse("- a\n- b\n"),
            Err(InputError::UnsupportedNode { kind: "sequence", .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_input_error() {
        assert!(matches!(parse("a: [unclosed"), Err(InputError::Yaml(_))));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "paramsync_document_{}.yaml",
            std::process::id()
        ));
        fs::write(&path, "flag: false\n").unwrap();
        let doc = load(&path).unwrap();
        assert_eq!(doc, vec![("flag".to_string(), ConfigNode::Bool(false))]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load(Path::new("/does/not/exist/paramsync.yaml")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }
}
