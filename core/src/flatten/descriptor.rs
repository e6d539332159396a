//! Parameter descriptors.
//!
//! A descriptor is a mapping with a `type` key. Its fields configure one
//! parameter and are never emitted as records of their own:
//!
//! ```yaml
//! password:
//!   type: secure     # "string" means plain; anything else means secret
//!   version: 1       # secrets are rewritten only when this goes up
//!   length: 20       # generated secret length, default 16
//!   value: literal   # optional; generated when absent
//! ```

use rand::Rng;
use tracing::debug;

use super::generate::generate;
use crate::error::InputError;
use crate::types::node::ConfigNode;
use crate::types::parameter::{ParameterKind, ParameterRecord, DEFAULT_SECRET_LENGTH};

/// `type` value that selects a plain parameter.
pub const PLAIN_TYPE: &str = "string";


/// Resolve a descriptor's fields into a record at `path`.
///
/// A descriptor without `type` resolves to a secret. Unknown fields are
/// ignored.
pub fn resolve_descriptor<R: Rng + ?Sized>(
    path: &str,
    fields: &[(String, ConfigNode)],
    rng: &mut R,
) -> Result<ParameterRecord, InputError> {
    debug!(path, "resolving parameter descriptor");

    let mut record = ParameterRecord {
        path: path.to_string(),
        kind: ParameterKind::Secret,
        version: None,
        length: DEFAULT_SECRET_LENGTH.to_string(),
        value: String::new(),
    };

    for (field, node) in fields {
        match field.as_str() {
            "type" => {
                record.kind = if field_text(path, field, node)? == PLAIN_TYPE {
                    ParameterKind::Plain
                } else {
                    ParameterKind::Secret
                };
            }
            "version" => record.version = Some(field_text(path, field, node)?),
            "length" => record.length = field_text(path, field, node)?,
            "value" => record.value = field_text(path, field, node)?,
            _ => {}
        }
    }

    if record.value.is_empty() {
        record.value = generate(&record, rng)?;
    }
    Ok(record)
}

fn field_text(path: &str, field: &str, node: &ConfigNode) -> Result<String, InputError> {
    node.scalar_text().ok_or_else(|| InputError::InvalidField {
        path: path.to_string(),
        field: field.to_string(),
    })
}
