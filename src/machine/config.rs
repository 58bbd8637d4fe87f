//! Machine configuration.

use crate::core::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse machine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_depth must be at least 1")]
    ZeroMaxDepth,
}

/// Per-machine settings.
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes.
///
/// # Example
///
/// ```rust
/// use strata::machine::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "name": "media", "record_history": true }"#).unwrap();
///
/// assert_eq!(config.name, "media");
/// assert_eq!(config.max_depth, 16);
/// assert!(config.record_history);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Name used as the prefix of every log line
    pub name: String,
    /// Maximum hierarchy depth, counting the state itself
    pub max_depth: usize,
    /// Keep a [`TransitionHistory`](crate::core::TransitionHistory)
    pub record_history: bool,
    /// Upper bound on kept history records, `None` for unbounded
    pub history_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: "StateMachine".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            record_history: false,
            history_limit: Some(64),
        }
    }
}

impl MachineConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        Ok(())
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable history recording with an optional bound.
    pub fn with_history(mut self, limit: Option<usize>) -> Self {
        self.record_history = true;
        self.history_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = MachineConfig::default();
        assert_eq!(config.name, "StateMachine");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!config.record_history);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = MachineConfig::from_json("{}").unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn zero_max_depth_is_rejected() {
        let result = MachineConfig::from_json(r#"{ "max_depth": 0 }"#);
        assert!(matches!(result, Err(ConfigError::ZeroMaxDepth)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = MachineConfig::from_json("{ name: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn builder_methods_compose() {
        let config = MachineConfig::named("pipeline")
            .with_max_depth(8)
            .with_history(None);

        assert_eq!(config.name, "pipeline");
        assert_eq!(config.max_depth, 8);
        assert!(config.record_history);
        assert_eq!(config.history_limit, None);
    }
}
