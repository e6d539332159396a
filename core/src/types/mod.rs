pub mod config;
pub mod node;
pub mod parameter;

pub use config::{BackoffStrategy, Settings};
pub use node::{ConfigMap, ConfigNode};
pub use parameter::{ParameterKind, ParameterRecord, RemoteRecord};
