//! Synchronizing flattened records into a parameter store.
//!
//! A run has two phases. The document is loaded and flattened, and every
//! secret's version is checked, before the store is touched; a malformed
//! document therefore never causes a partial write. Records are then
//! processed one at a time in path order: read history, decide, write.
//! The first store error stops the run; writes already made stay made.

pub mod decision;
pub mod retry;

use std::collections::BTreeMap;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::document;
use crate::error::{InputError, StoreError, SyncError};
use crate::flatten::{self, RecordSet};
use crate::store::ParameterStore;
use crate::types::parameter::{ParameterKind, ParameterRecord, RemoteRecord};

pub use decision::{decide, needs_write, Action};
pub use retry::RetryPolicy;


/// Load a document from disk and flatten it.
pub fn load_records<R: Rng + ?Sized>(path: &Path, rng: &mut R) -> Result<RecordSet, InputError> {
    let doc = document::load(path)?;
    let records = flatten::flatten(&doc, rng)?;
    let counts = kind_counts(&records);
    info!(
        count = records.len(),
        plain = counts.get(&ParameterKind::Plain).copied().unwrap_or(0),
        secret = counts.get(&ParameterKind::Secret).copied().unwrap_or(0),
        "flattened {}",
        path.display()
    );
    Ok(records)
}

/// Check every input that a decision will need, so input errors surface
/// before any store call.
pub fn validate(records: &RecordSet) -> Result<(), InputError> {
    for record in records.values() {
        if record.kind == ParameterKind::Secret {
            record.version_number()?;
        }
    }
    Ok(())
}


// ---------------------------------------------------------------------------
// SyncReport
// ---------------------------------------------------------------------------

/// Outcome for one record. Values are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub path: String,
    pub kind: ParameterKind,
    pub action: Action,
}

/// Per-record outcomes of a plan or an applied run, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// False for a plan: the actions were decided but not performed.
    pub applied: bool,
    pub entries: Vec<ReportEntry>,
}

impl SyncReport {
    pub fn count(&self, action: Action) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }

    /// Paths that were (or would be) written.
    pub fn written(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.action.is_write())
            .map(|e| e.path.as_str())
            .collect()
    }

    /// One-line summary, e.g. `2 created, 1 updated, 3 unchanged`.
    pub fn summary(&self) -> String {
        format!(
            "{} created, {} updated, {} unchanged",
            self.count(Action::Create),
            self.count(Action::Update),
            self.count(Action::Unchanged)
        )
    }
}


// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Applies record sets to a store.
pub struct Synchronizer<S> {
    store: S,
    retry: RetryPolicy,
}

impl<S: ParameterStore> Synchronizer<S> {
    pub fn new(store: S) -> Self {
        Synchronizer {
            store,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Decide every record without writing anything.
    pub fn plan(&self, records: &RecordSet) -> Result<SyncReport, SyncError> {
        validate(records)?;
        let mut report = SyncReport::default();
        for record in records.values() {
            let history = self.history(&record.path)?;
            let action = decide(record, &history)?;
            report.entries.push(entry(record, action));
        }
        Ok(report)
    }

    /// Decide and write every record that needs it.
    pub fn apply(&mut self, records: &RecordSet) -> Result<SyncReport, SyncError> {
        validate(records)?;
        let mut report = SyncReport {
            applied: true,
            entries: Vec::with_capacity(records.len()),
        };
        for record in records.values() {
            let history = self.history(&record.path)?;
            let action = decide(record, &history)?;
            if action.is_write() {
                info!(path = %record.path, kind = %record.kind, "creating or updating parameter");
                self.write(record, action == Action::Update)?;
            } else {
                info!(path = %record.path, "parameter already up to date");
            }
            report.entries.push(entry(record, action));
        }
        info!("{}", report.summary());
        Ok(report)
    }

    fn history(&self, path: &str) -> Result<Vec<RemoteRecord>, StoreError> {
        self.retry.run(path, || match self.store.get_history(path) {
            Err(StoreError::NotFound(_)) => Ok(Vec::new()),
            other => other,
        })
    }

    fn write(&mut self, record: &ParameterRecord, overwrite: bool) -> Result<(), StoreError> {
        let Synchronizer { store, retry } = self;
        retry.run(&record.path, || {
            store.put_parameter(&record.path, record.kind, &record.value, overwrite)
        })
    }
}

fn entry(record: &ParameterRecord, action: Action) -> ReportEntry {
    ReportEntry {
        path: record.path.clone(),
        kind: record.kind,
        action,
    }
}

/// Count records by kind, for logging.
fn kind_counts(records: &RecordSet) -> BTreeMap<ParameterKind, usize> {
    let mut counts = BTreeMap::new();
    for record in records.values() {
        *counts.entry(record.kind).or_insert(0) += 1;
    }
    counts
}
