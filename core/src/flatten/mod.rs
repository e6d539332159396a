//! Document flattening.
//!
//! Walks a `ConfigMap` depth-first and produces one `ParameterRecord` per
//! scalar leaf or descriptor, keyed by normalized path:
//!
//! ```yaml
//! db:
//!   host: localhost          # -> /db/host      plain "localhost"
//!   password:                # -> /db/password  secret, 20 random letters
//!     type: secure
//!     length: 20
//!     version: 1
//! retries: 3                 # -> retries       plain "3"
//! ```

pub mod descriptor;
pub mod generate;
pub mod path;

use std::collections::BTreeMap;

use rand::Rng;

use crate::error::InputError;
use crate::types::node::{ConfigMap, ConfigNode};
use crate::types::parameter::ParameterRecord;

pub use descriptor::resolve_descriptor;
pub use generate::generate;
pub use path::build_path;

/// Flattened records keyed by path. Iteration is in path order.
pub type RecordSet = BTreeMap<String, ParameterRecord>;


/// Flatten a document into records.
///
/// Top-level scalars keep their bare key as path (`flag`); everything below
/// the top level, and any top-level descriptor, gets a `/`-rooted path.
/// When two nodes produce the same path, the later one wins.
pub fn flatten<R: Rng + ?Sized>(root: &ConfigMap, rng: &mut R) -> Result<RecordSet, InputError> {
    let mut walker = Walker {
        rng,
        result: BTreeMap::new(),
    };
    for (key, node) in root {
        check_key("", key)?;
        match node {
            ConfigNode::Map(fields) if node.is_descriptor() => {
                walker.descriptor(&path::child("", key), fields)?;
            }
            _ => walker.node(key, node)?,
        }
    }
    Ok(walker.result)
}


struct Walker<'a, R: ?Sized> {
    rng: &'a mut R,
    result: RecordSet,
}

impl<R: Rng + ?Sized> Walker<'_, R> {
    fn node(&mut self, prefix: &str, node: &ConfigNode) -> Result<(), InputError> {
        match node {
            ConfigNode::Map(entries) => self.map(prefix, entries),
            leaf => {
                // Scalars always have text; only maps return None.
                let value = leaf.scalar_text().unwrap_or_default();
                self.insert(ParameterRecord::plain(&path::normalize(prefix), &value));
                Ok(())
            }
        }
    }

    fn map(&mut self, prefix: &str, entries: &[(String, ConfigNode)]) -> Result<(), InputError> {
        for (key, child) in entries {
            check_key(prefix, key)?;
            let child_path = path::child(prefix, key);
            match child {
                ConfigNode::Map(fields) if child.is_descriptor() => {
                    self.descriptor(&child_path, fields)?;
                }
                _ => self.node(&child_path, child)?,
            }
        }
        Ok(())
    }

    fn descriptor(
        &mut self,
        raw_path: &str,
        fields: &[(String, ConfigNode)],
    ) -> Result<(), InputError> {
        let path = path::normalize(raw_path);
        let record = resolve_descriptor(&path, fields, &mut *self.rng)?;
        self.insert(record);
        Ok(())
    }

    fn insert(&mut self, record: ParameterRecord) {
        self.result.insert(record.path.clone(), record);
    }
}

/// Keys may contain `/` to address nested paths directly, but every segment
/// must be non-empty so the joined path never has a trailing or doubled `/`.
fn check_key(prefix: &str, key: &str) -> Result<(), InputError> {
    if key.is_empty() {
        return Err(InputError::EmptyKey {
            path: path::normalize(prefix),
        });
    }
    if key.split(path::DELIMITER).any(str::is_empty) {
        return Err(InputError::InvalidKey {
            path: path::normalize(prefix),
            key: key.to_string(),
        });
    }
    Ok(())
}
