//! Flat parameter records and the store's view of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Length of a generated secret when the descriptor does not say otherwise.
pub const DEFAULT_SECRET_LENGTH: &str = "16";

/// Longest secret that will be generated. Matches the store's value limit.
pub const MAX_SECRET_LENGTH: usize = 4096;


/// How a parameter is stored and when it is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Overwritten whenever the content differs.
    Plain,
    /// Overwritten only when the local version is ahead of the store.
    Secret,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Plain => "plain",
            ParameterKind::Secret => "secret",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// A fully resolved parameter, addressed by its normalized path.
///
/// `version` and `length` keep the text they had in the document; they are
/// parsed only where a decision depends on them.
#[derive(Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    pub path: String,
    pub kind: ParameterKind,
    pub version: Option<String>,
    pub length: String,
    pub value: String,
}

impl ParameterRecord {
    /// A plain record with a literal value.
    pub fn plain(path: &str, value: &str) -> Self {
        ParameterRecord {
            path: path.to_string(),
            kind: ParameterKind::Plain,
            version: None,
            length: DEFAULT_SECRET_LENGTH.to_string(),
            value: value.to_string(),
        }
    }

    /// Parse `version` as an integer. Missing or malformed versions fail.
    pub fn version_number(&self) -> Result<i64, InputError> {
        let raw = self.version.as_deref().unwrap_or("");
        raw.parse::<i64>().map_err(|_| InputError::InvalidVersion {
            path: self.path.clone(),
            value: raw.to_string(),
        })
    }

    /// Parse `length` as a character count in `1..=MAX_SECRET_LENGTH`.
    pub fn length_number(&self) -> Result<usize, InputError> {
        match self.length.parse::<usize>() {
            Ok(n) if (1..=MAX_SECRET_LENGTH).contains(&n) => Ok(n),
            _ => Err(InputError::InvalidLength {
                path: self.path.clone(),
                value: self.length.clone(),
            }),
        }
    }
}

impl fmt::Debug for ParameterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self.kind {
            ParameterKind::Plain => self.value.as_str(),
            ParameterKind::Secret => "<redacted>",
        };
        f.debug_struct("ParameterRecord")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("length", &self.length)
            .field("value", &value)
            .finish()
    }
}


/// One entry of a parameter's history as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub value: String,
    pub version: i64,
}
