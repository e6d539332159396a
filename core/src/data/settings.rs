//! Settings loading and environment overrides.
//!
//! Precedence, lowest first: built-in defaults, settings file, environment,
//! command-line flags (applied by the binary).

use std::path::{Path, PathBuf};

use crate::error::{InputError, StoreError};
use crate::store::StoreLocator;
use crate::sync::retry::RetryPolicy;
use crate::types::config::Settings;

/// Path of a settings file, when `--config` is not given.
pub const CONFIG_ENV: &str = "PARAMSYNC_CONFIG";
/// Store endpoint override.
pub const STORE_ENV: &str = "PARAMSYNC_STORE";
/// Region label override.
pub const REGION_ENV: &str = "PARAMSYNC_REGION";


/// Load `Settings` from a YAML file.
pub fn load(path: &Path) -> Result<Settings, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Parse settings from YAML text. Blank text yields the defaults.
pub fn parse(content: &str) -> Result<Settings, InputError> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Apply environment overrides. `lookup` is `std::env::var` in production
/// and a closure over a fixed map in tests.
pub fn apply_env<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(store) = lookup(STORE_ENV).filter(|s| !s.is_empty()) {
        settings.store = Some(store);
    }
    if let Some(region) = lookup(REGION_ENV).filter(|s| !s.is_empty()) {
        settings.region = Some(region);
    }
}

/// Resolve settings for a run: explicit file, else `$PARAMSYNC_CONFIG`,
/// else defaults; then environment overrides.
pub fn resolve(explicit: Option<&Path>) -> Result<Settings, InputError> {
    let file: Option<PathBuf> = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));
    let mut settings = match file {
        Some(path) => load(&path)?,
        None => Settings::default(),
    };
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// The retry policy described by these settings.
pub fn retry_policy(settings: &Settings) -> RetryPolicy {
    RetryPolicy::new(
        settings.max_retries,
        settings.backoff_strategy.clone(),
        settings.retry_base_delay_ms,
    )
}

/// The store endpoint described by these settings. A bare `ssm:` endpoint,
/// or no endpoint at all, takes its region from `region`.
pub fn store_locator(settings: &Settings) -> Result<StoreLocator, StoreError> {
    let region = settings.region.clone();
    match settings.store.as_deref() {
        Some(endpoint) => match StoreLocator::parse(endpoint)? {
            StoreLocator::Ssm(None) => Ok(StoreLocator::Ssm(region)),
            locator => Ok(locator),
        },
        None if region.is_some() => Ok(StoreLocator::Ssm(region)),
        None => Err(StoreError::MissingEndpoint),
    }
}
