//! Whether a record has to be written.
//!
//! Secrets are gated on version: a secret is rewritten only when the local
//! version is strictly ahead of the store's latest. Editing a secret's value
//! without bumping its version changes nothing. Plain parameters are
//! rewritten whenever their content differs.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::types::parameter::{ParameterKind, ParameterRecord, RemoteRecord};


/// What a sync run does for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// The store has no value yet.
    Create,
    /// The store has an older or different value.
    Update,
    /// The store is already up to date.
    Unchanged,
}

impl Action {
    pub fn is_write(&self) -> bool {
        !matches!(self, Action::Unchanged)
    }
}


/// Decide whether `local` must be written given the store's `history`
/// (most recent first; only the head is consulted).
pub fn needs_write(local: &ParameterRecord, history: &[RemoteRecord]) -> Result<bool, InputError> {
    match local.kind {
        ParameterKind::Secret => {
            let version = local.version_number()?;
            Ok(history.first().map_or(true, |head| head.version < version))
        }
        ParameterKind::Plain => Ok(history.first().map_or(true, |head| head.value != local.value)),
    }
}

/// Classify the write `needs_write` asks for.
pub fn decide(local: &ParameterRecord, history: &[RemoteRecord]) -> Result<Action, InputError> {
    if !needs_write(local, history)? {
        return Ok(Action::Unchanged);
    }
    if history.is_empty() {
        Ok(Action::Create)
    } else {
        Ok(Action::Update)
    }
}
