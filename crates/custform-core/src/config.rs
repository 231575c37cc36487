//! Engine configuration.
//!
//! Every setting has a default, so an empty JSON object or an empty
//! environment yields the stock behaviour.
//!
//! # Example
//!
//! ```rust
//! use custform_core::config::FormConfig;
//! use std::time::Duration;
//!
//! let config = FormConfig::from_json_str(r#"{"debounce_ms": 250}"#).unwrap();
//! assert_eq!(config.debounce_window(), Duration::from_millis(250));
//! ```

use crate::error::Result;
use crate::messages::{default_messages, UnmappedKindPolicy};
use custform_validate::ErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `CUSTFORM_DEBOUNCE_MS`.
pub const ENV_PREFIX: &str = "CUSTFORM_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Quiescence window before a debounced field is re-evaluated
    pub debounce_ms: u64,
    /// Display text per error kind
    pub messages: BTreeMap<ErrorKind, String>,
    /// What the resolver shows for a kind missing from `messages`
    pub unmapped: UnmappedKindPolicy,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            messages: default_messages(),
            unmapped: UnmappedKindPolicy::default(),
        }
    }
}

/// Settings that may be overridden from the environment.
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    debounce_ms: Option<u64>,
    unmapped: Option<UnmappedKindPolicy>,
}

impl FormConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse a JSON document; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults with `CUSTFORM_*` environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(std::env::vars())
    }

    /// Apply `CUSTFORM_*` overrides from an explicit variable list.
    pub fn with_overrides<I>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides: EnvOverrides = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        if let Some(ms) = overrides.debounce_ms {
            self.debounce_ms = ms;
        }
        if let Some(policy) = overrides.unmapped {
            self.unmapped = policy;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let config = FormConfig::default();
        assert_eq!(config.debounce_window(), Duration::from_millis(1000));
        assert_eq!(
            config.messages[&ErrorKind::Required],
            "Please enter your email address"
        );
        assert_eq!(config.unmapped, UnmappedKindPolicy::RuleMessage);
    }

    #[test]
    fn json_keeps_defaults_for_missing_keys() {
        let config = FormConfig::from_json_str(r#"{"unmapped": "kind_name"}"#).unwrap();
        assert_eq!(config.unmapped, UnmappedKindPolicy::KindName);
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.messages, default_messages());
    }

    #[test]
    fn json_replaces_message_table() {
        let config =
            FormConfig::from_json_str(r#"{"messages": {"range": "Rate us from 1 to 5"}}"#).unwrap();
        assert_eq!(config.messages.len(), 1);
        assert_eq!(config.messages[&ErrorKind::Range], "Rate us from 1 to 5");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = FormConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, FormError::Serialization(_)));
    }

    #[test]
    fn env_overrides() {
        let config = FormConfig::default()
            .with_overrides(vars(&[
                ("CUSTFORM_DEBOUNCE_MS", "300"),
                ("CUSTFORM_UNMAPPED", "empty"),
                ("OTHER_DEBOUNCE_MS", "5"),
            ]))
            .unwrap();
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.unmapped, UnmappedKindPolicy::Empty);
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let err = FormConfig::default()
            .with_overrides(vars(&[("CUSTFORM_DEBOUNCE_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, FormError::Config(_)));
    }
}
