//! Parsed document tree.
//!
//! A document is a mapping from string keys to `ConfigNode`s. Only four node
//! shapes exist; anything else the YAML parser produces is rejected while
//! the tree is built (see `data::document`).

/// Mapping entries in document order.
pub type ConfigMap = Vec<(String, ConfigNode)>;

/// A single node of a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNode {
    Bool(bool),
    Int(i64),
    Str(String),
    Map(ConfigMap),
}

impl ConfigNode {
    /// Short name of the node shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigNode::Bool(_) => "boolean",
            ConfigNode::Int(_) => "integer",
            ConfigNode::Str(_) => "string",
            ConfigNode::Map(_) => "mapping",
        }
    }

    /// Look up a key in a mapping node. Returns `None` for scalars.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        match self {
            ConfigNode::Map(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// True for a mapping that carries a `type` key. Such a mapping describes
    /// one parameter rather than a further level of nesting.
    pub fn is_descriptor(&self) -> bool {
        self.get("type").is_some()
    }

    /// Text form of a scalar; `None` for mappings.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            ConfigNode::Bool(b) => Some(b.to_string()),
            ConfigNode::Int(i) => Some(i.to_string()),
            ConfigNode::Str(s) => Some(s.clone()),
            ConfigNode::Map(_) => None,
        }
    }
}
