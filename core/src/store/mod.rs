//! Parameter store backends.
//!
//! Provides the `ParameterStore` trait and its implementations: an
//! in-process `MemoryStore` for tests and dry runs, a JSON-file backed
//! `FileStore`, and `SsmStore` over AWS Systems Manager. A store keeps every
//! version written to a path, most recent first.

pub mod file;
pub mod memory;
pub mod ssm;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::parameter::{ParameterKind, RemoteRecord};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use ssm::SsmStore;

/// Trait for parameter store backends.
pub trait ParameterStore {
    /// History of `path`, most recent first. A path that was never written
    /// yields either an empty list or `StoreError::NotFound`; callers treat
    /// both the same.
    fn get_history(&self, path: &str) -> Result<Vec<RemoteRecord>, StoreError>;

    /// Write a new version of `path`. Without `overwrite`, writing onto a
    /// path that already has a value fails with `StoreError::AlreadyExists`.
    fn put_parameter(
        &mut self,
        path: &str,
        kind: ParameterKind,
        value: &str,
        overwrite: bool,
    ) -> Result<(), StoreError>;
}

impl<S: ParameterStore + ?Sized> ParameterStore for Box<S> {
    fn get_history(&self, path: &str) -> Result<Vec<RemoteRecord>, StoreError> {
        (**self).get_history(path)
    }

    fn put_parameter(
        &mut self,
        path: &str,
        kind: ParameterKind,
        value: &str,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        (**self).put_parameter(path, kind, value, overwrite)
    }
}


// ---------------------------------------------------------------------------
// Stored versions
// ---------------------------------------------------------------------------

/// One version of a parameter as kept by the bundled backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredVersion {
    pub kind: ParameterKind,
    pub value: String,
    pub version: i64,
}

impl StoredVersion {
    pub fn to_remote(&self) -> RemoteRecord {
        RemoteRecord {
            value: self.value.clone(),
            version: self.version,
        }
    }
}

/// Prepend a new version to `history`, numbering it one past the current
/// head (or 1 for a fresh path).
pub fn push_version(
    history: &mut Vec<StoredVersion>,
    path: &str,
    kind: ParameterKind,
    value: &str,
    overwrite: bool,
) -> Result<i64, StoreError> {
    if !history.is_empty() && !overwrite {
        return Err(StoreError::AlreadyExists(path.to_string()));
    }
    let version = history.first().map_or(1, |head| head.version + 1);
    history.insert(
        0,
        StoredVersion {
            kind,
            value: value.to_string(),
            version,
        },
    );
    Ok(version)
}


// ---------------------------------------------------------------------------
// StoreLocator
// ---------------------------------------------------------------------------

/// Parsed store endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocator {
    /// `memory:`, nothing persists past the process.
    Memory,
    /// `file:<path>`, a JSON document on disk.
    File(PathBuf),
    /// `ssm:<region>`. A bare `ssm:` leaves the region to settings.
    Ssm(Option<String>),
}

impl StoreLocator {
    pub fn parse(endpoint: &str) -> Result<Self, StoreError> {
        let endpoint = endpoint.trim();
        if endpoint == "memory:" {
            return Ok(StoreLocator::Memory);
        }
        if let Some(region) = endpoint.strip_prefix("ssm:") {
            let region = region.trim();
            return Ok(StoreLocator::Ssm(
                (!region.is_empty()).then(|| region.to_string()),
            ));
        }
        match endpoint.strip_prefix("file:") {
            Some(path) if !path.is_empty() => Ok(StoreLocator::File(PathBuf::from(path))),
            _ => Err(StoreError::UnsupportedEndpoint(endpoint.to_string())),
        }
    }

    /// Open the backend this locator points at.
    pub fn open(&self) -> Result<Box<dyn ParameterStore>, StoreError> {
        match self {
            StoreLocator::Memory => Ok(Box::new(MemoryStore::new())),
            StoreLocator::File(path) => Ok(Box::new(FileStore::open(path)?)),
            StoreLocator::Ssm(Some(region)) => Ok(Box::new(SsmStore::connect(region)?)),
            StoreLocator::Ssm(None) => Err(StoreError::MissingRegion),
        }
    }
}
