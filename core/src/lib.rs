//! paramsync core: turns a nested YAML parameter document into flat,
//! addressable parameter records and synchronizes them into a parameter
//! store without redundant writes.
//!
//! ```text
//! document::load -> flatten::flatten -> Synchronizer::apply -> ParameterStore
//! ```

pub mod data;
pub mod error;
pub mod flatten;
pub mod store;
pub mod sync;
pub mod types;

pub use error::{InputError, StoreError, SyncError};
pub use flatten::{flatten, RecordSet};
pub use store::{ParameterStore, StoreLocator};
pub use sync::{SyncReport, Synchronizer};
pub use types::{ConfigNode, ParameterKind, ParameterRecord, RemoteRecord};
