//! Error types shared across the crate.
//!
//! Input errors come from the document and are always detected before the
//! first store call. Store errors come from the parameter store backend.

use std::path::PathBuf;

use thiserror::Error;


// ---------------------------------------------------------------------------
// InputError
// ---------------------------------------------------------------------------

/// A malformed document, descriptor, or settings file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The document or settings file could not be read.
    #[error("cannot read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid YAML, or does not match the expected shape.
    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A mapping key that is not a string (integer, boolean, ...).
    #[error("{path}: map key is not a string: {key}")]
    NonStringKey { path: String, key: String },

    /// A mapping key that is the empty string.
    #[error("{path}: empty map key")]
    EmptyKey { path: String },

    /// A mapping key with a leading or trailing `/`, or an empty segment.
    #[error("{path}: map key '{key}' has an empty path segment")]
    InvalidKey { path: String, key: String },

    /// A sequence, float, null, or tagged value.
    #[error("{path}: unsupported node kind: {kind}")]
    UnsupportedNode { path: String, kind: &'static str },

    /// A descriptor field that must be a scalar holds a mapping.
    #[error("{path}: descriptor field '{field}' must be a scalar")]
    InvalidField { path: String, field: String },

    /// A secret `length` that is not a positive integer within bounds.
    #[error("{path}: unable to parse parameter length '{value}'")]
    InvalidLength { path: String, value: String },

    /// A secret `version` that is missing or not an integer.
    #[error("{path}: unable to parse parameter version '{value}'")]
    InvalidVersion { path: String, value: String },
}


// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// A failure reported by a parameter store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path has never been written. Callers treat this as empty history.
    #[error("parameter not found: {0}")]
    NotFound(String),

    /// A put without `overwrite` hit a path that already has a value.
    #[error("parameter {0} already exists and overwrite was not requested")]
    AlreadyExists(String),

    /// Transient failure; the operation may be retried.
    #[error("store unavailable for {path}: {reason}")]
    Unavailable { path: String, reason: String },

    #[error("store I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The backend rejected the request and retrying will not help.
    #[error("store rejected request for {path}: {reason}")]
    Rejected { path: String, reason: String },

    #[error("cannot start store runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(
        "unsupported store endpoint '{0}' (expected 'memory:', 'file:<path>' or 'ssm:<region>')"
    )]
    UnsupportedEndpoint(String),

    #[error("no store endpoint configured")]
    MissingEndpoint,

    #[error("no region configured for the ssm store (use 'ssm:<region>' or --region)")]
    MissingRegion,
}

impl StoreError {
    /// Whether retrying the same operation could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}


// ---------------------------------------------------------------------------
// SyncError
// ---------------------------------------------------------------------------

/// Any error that aborts a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_transient() {
        let transient = StoreError::Unavailable {
            path: "/a".into(),
            reason: "throttled".into(),
        };
        assert!(transient.is_transient());
        assert!(!StoreError::NotFound("/a".into()).is_transient());
        assert!(!StoreError::AlreadyExists("/a".into()).is_transient());
        let rejected = StoreError::Rejected {
            path: "/a".into(),
            reason: "access denied".into(),
        };
        assert!(!rejected.is_transient());
    }

    #[test]
    fn sync_error_display_is_transparent() {
        let err: SyncError = InputError::InvalidLength {
            path: "/db/password".into(),
            value: "abc".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "/db/password: unable to parse parameter length 'abc'"
        );
    }

    #[test]
    fn io_error_mentions_path() {
        let err = InputError::Io {
            path: PathBuf::from("/nope/params.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nope/params.yaml"));
    }
}
