use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    Exponential,
    Linear,
    Fixed,
}

/// Run settings. Every field has a default, so a settings file only needs
/// the keys it wants to change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Store endpoint: `memory:`, `file:<path>` or `ssm:<region>`.
    pub store: Option<String>,
    /// Region for a bare `ssm:` endpoint, or for the ssm store when no
    /// endpoint is set.
    pub region: Option<String>,
    /// Retries for transient store errors. Zero disables retrying.
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub backoff_strategy: BackoffStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            store: None,
            region: None,
            max_retries: 0,
            retry_base_delay_ms: 500,
            backoff_strategy: BackoffStrategy::Exponential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let settings = Settings {
            store: Some("file:/tmp/params.json".into()),
            region: Some("eu-west-1".into()),
            max_retries: 3,
            retry_base_delay_ms: 250,
            backoff_strategy: BackoffStrategy::Linear,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn backoff_strategy_serde() {
        let json = serde_json::to_string(&BackoffStrategy::Exponential).unwrap();
        assert_eq!(json, "\"exponential\"");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str("{\"max_retries\": 2}").unwrap();
        assert_eq!(settings.max_retries, 2);
        assert_eq!(settings.retry_base_delay_ms, 500);
        assert!(settings.store.is_none());
    }
}
