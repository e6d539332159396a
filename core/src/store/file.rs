//! JSON-file parameter store.
//!
//! The whole store is one JSON object mapping path to history (most recent
//! first). It is read once on open and rewritten after every put. A file
//! that does not exist yet is an empty store.
//!
//! Each save writes a sibling `<name>.tmp` file and renames it over the
//! store, so a failed write never leaves a truncated document behind. The
//! in-memory copy only changes once the save has succeeded.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use super::{push_version, ParameterStore, StoredVersion};
use crate::error::StoreError;
use crate::types::parameter::{ParameterKind, RemoteRecord};

pub struct FileStore {
    path: PathBuf,
    params: BTreeMap<String, Vec<StoredVersion>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing content if any.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let params = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(FileStore { path, params })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.params)?;
        let temp = self.temp_path();
        if let Err(source) = fs::write(&temp, json) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::Io { path: temp, source });
        }
        fs::rename(&temp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&temp);
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

impl ParameterStore for FileStore {
    fn get_history(&self, path: &str) -> Result<Vec<RemoteRecord>, StoreError> {
        Ok(self
            .params
            .get(path)
            .map(|h| h.iter().map(StoredVersion::to_remote).collect())
            .unwrap_or_default())
    }

    fn put_parameter(
        &mut self,
        path: &str,
        kind: ParameterKind,
        value: &str,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        let previous = self.params.get(path).cloned();
        let mut history = previous.clone().unwrap_or_default();
        push_version(&mut history, path, kind, value, overwrite)?;
        self.params.insert(path.to_string(), history);

        if let Err(err) = self.save() {
            match previous {
                Some(history) => self.params.insert(path.to_string(), history),
                None => self.params.remove(path),
            };
            return Err(err);
        }
        Ok(())
    }
}
