//! In-process parameter store.
//!
//! Records every write and can be primed with history and transient
//! failures, making it easy to write deterministic tests for the
//! synchronizer. Unknown paths report `NotFound`, the way hosted parameter
//! stores do.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{push_version, ParameterStore, StoredVersion};
use crate::error::StoreError;
use crate::types::parameter::{ParameterKind, RemoteRecord};

/// A write as received by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    pub path: String,
    pub kind: ParameterKind,
    pub value: String,
    pub overwrite: bool,
}

/// A store that lives in memory for the duration of the process.
pub struct MemoryStore {
    /// Every successful write, in order.
    pub puts: Vec<PutRequest>,
    /// Number of history lookups served.
    reads: RefCell<usize>,
    params: HashMap<String, Vec<StoredVersion>>,
    failing_reads: RefCell<HashMap<String, u32>>,
    failing_writes: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            puts: Vec::new(),
            reads: RefCell::new(0),
            params: HashMap::new(),
            failing_reads: RefCell::new(HashMap::new()),
            failing_writes: HashMap::new(),
        }
    }

    /// Pre-load a version of `path` without recording a put.
    pub fn seed(&mut self, path: &str, kind: ParameterKind, value: &str, version: i64) {
        self.params.entry(path.to_string()).or_default().insert(
            0,
            StoredVersion {
                kind,
                value: value.to_string(),
                version,
            },
        );
    }

    /// Make the next `times` history lookups of `path` fail transiently.
    pub fn fail_reads(&mut self, path: &str, times: u32) {
        self.failing_reads
            .get_mut()
            .insert(path.to_string(), times);
    }

    /// Make the next `times` writes to `path` fail transiently.
    pub fn fail_writes(&mut self, path: &str, times: u32) {
        self.failing_writes.insert(path.to_string(), times);
    }

    /// Most recent stored version of `path`.
    pub fn current(&self, path: &str) -> Option<&StoredVersion> {
        self.params.get(path).and_then(|h| h.first())
    }

    pub fn read_count(&self) -> usize {
        *self.reads.borrow()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore for MemoryStore {
    fn get_history(&self, path: &str) -> Result<Vec<RemoteRecord>, StoreError> {
        *self.reads.borrow_mut() += 1;
        if take_failure(&mut self.failing_reads.borrow_mut(), path) {
            return Err(StoreError::Unavailable {
                path: path.to_string(),
                reason: "injected read failure".into(),
            });
        }
        match self.params.get(path) {
            Some(history) => Ok(history.iter().map(StoredVersion::to_remote).collect()),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }

    fn put_parameter(
        &mut self,
        path: &str,
        kind: ParameterKind,
        value: &str,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        if take_failure(&mut self.failing_writes, path) {
            return Err(StoreError::Unavailable {
                path: path.to_string(),
                reason: "injected write failure".into(),
            });
        }
        let history = self.params.entry(path.to_string()).or_default();
        push_version(history, path, kind, value, overwrite)?;
        self.puts.push(PutRequest {
            path: path.to_string(),
            kind,
            value: value.to_string(),
            overwrite,
        });
        Ok(())
    }
}

fn take_failure(failures: &mut HashMap<String, u32>, path: &str) -> bool {
    match failures.get_mut(path) {
        Some(remaining) if *remaining > 0 => {
            *remaining -= 1;
            true
        }
        _ => false,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_path_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_history("/missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn records_puts() {
        let mut store = MemoryStore::new();
        store
            .put_parameter("/a", ParameterKind::Plain, "x", false)
            .unwrap();
        assert_eq!(store.puts.len(), 1);
        assert_eq!(store.puts[0].path, "/a");
        assert!(!store.puts[0].overwrite);
        assert_eq!(store.current("/a").unwrap().version, 1);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut store = MemoryStore::new();
        store.seed("/a", ParameterKind::Secret, "old", 1);
        store
            .put_parameter("/a", ParameterKind::Secret, "new", true)
            .unwrap();
        let history = store.get_history("/a").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], RemoteRecord { value: "new".into(), version: 2 });
        assert_eq!(history[1], RemoteRecord { value: "old".into(), version: 1 });
    }

    #[test]
    fn injected_read_failures_run_out() {
        let mut store = MemoryStore::new();
        store.seed("/a", ParameterKind::Plain, "x", 1);
        store.fail_reads("/a", 2);
        assert!(store.get_history("/a").unwrap_err().is_transient());
        assert!(store.get_history("/a").unwrap_err().is_transient());
        assert!(store.get_history("/a").is_ok());
        assert_eq!(store.read_count(), 3);
    }

    #[test]
    fn injected_write_failure_does_not_record() {
        let mut store = MemoryStore::new();
        store.fail_writes("/a", 1);
        assert!(store
            .put_parameter("/a", ParameterKind::Plain, "x", false)
            .is_err());
        assert!(store.puts.is_empty());
        assert!(store.current("/a").is_none());
    }
}
