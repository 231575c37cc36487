//! Error types for form validation.
//!
//! Validation failures are data: a rule returns a [`RuleError`] and the form
//! collects them per control. Nothing here is ever raised as a fatal error.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Symbolic tag identifying which rule failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorKind {
    Required,
    MinLength,
    MaxLength,
    Email,
    Range,
    Match,
    /// Kind reported by a user-defined rule
    Custom(String),
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::MinLength => "minlength",
            ErrorKind::MaxLength => "maxlength",
            ErrorKind::Email => "email",
            ErrorKind::Range => "range",
            ErrorKind::Match => "match",
            ErrorKind::Custom(name) => name,
        }
    }
}

impl From<&str> for ErrorKind {
    fn from(s: &str) -> Self {
        match s {
            "required" => ErrorKind::Required,
            "minlength" => ErrorKind::MinLength,
            "maxlength" => ErrorKind::MaxLength,
            "email" => ErrorKind::Email,
            "range" => ErrorKind::Range,
            "match" => ErrorKind::Match,
            other => ErrorKind::Custom(other.to_string()),
        }
    }
}

impl From<String> for ErrorKind {
    fn from(s: String) -> Self {
        ErrorKind::from(s.as_str())
    }
}

impl From<ErrorKind> for String {
    fn from(kind: ErrorKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from a single validation rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleError {
    /// Which rule failed
    pub kind: ErrorKind,
    /// Default human-readable message, may contain `{param}` placeholders
    pub message: String,
    /// Parameters for message interpolation
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, serde_json::Value>,
}

impl RuleError {
    /// Create a new rule error.
    pub fn new(kind: impl Into<ErrorKind>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter to the error.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Interpolate parameters into the message.
    ///
    /// Replaces `{param_name}` placeholders with actual values.
    pub fn interpolate_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            let placeholder = format!("{{{}}}", key);
            let replacement = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => value.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }
        result
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.interpolate_message())
    }
}

impl std::error::Error for RuleError {}

/// Failing rules for a whole form, keyed by control path.
///
/// Group-level failures are stored under the group's own path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    pub controls: BTreeMap<String, Vec<RuleError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error for a control.
    pub fn add(&mut self, path: impl Into<String>, error: RuleError) {
        self.controls.entry(path.into()).or_default().push(error);
    }

    /// Add multiple errors for a control.
    pub fn add_all(
        &mut self,
        path: impl Into<String>,
        errors: impl IntoIterator<Item = RuleError>,
    ) {
        let path = path.into();
        for error in errors {
            self.add(path.clone(), error);
        }
    }

    /// Merge another collection into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (path, errors) in other.controls {
            self.add_all(path, errors);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Total number of errors across all controls.
    pub fn len(&self) -> usize {
        self.controls.values().map(|v| v.len()).sum()
    }

    pub fn get(&self, path: &str) -> Option<&Vec<RuleError>> {
        self.controls.get(path)
    }

    /// Whether the control at `path` failed with `kind`.
    pub fn has(&self, path: &str, kind: &ErrorKind) -> bool {
        self.get(path)
            .is_some_and(|errors| errors.iter().any(|e| &e.kind == kind))
    }

    /// Ok if no errors, Err otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn paths(&self) -> Vec<&str> {
        self.controls.keys().map(|s| s.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} error(s)", self.len())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::MinLength.as_str(), "minlength");
        assert_eq!(ErrorKind::from("match"), ErrorKind::Match);
        assert_eq!(
            ErrorKind::from("zip_code"),
            ErrorKind::Custom("zip_code".to_string())
        );
    }

    #[test]
    fn kind_serializes_as_string() {
        let json = serde_json::to_string(&ErrorKind::Range).unwrap();
        assert_eq!(json, "\"range\"");

        let parsed: BTreeMap<ErrorKind, String> =
            serde_json::from_str(r#"{"required":"x","match":"y"}"#).unwrap();
        assert_eq!(parsed[&ErrorKind::Required], "x");
        assert_eq!(parsed[&ErrorKind::Match], "y");
    }

    #[test]
    fn rule_error_with_params() {
        let error = RuleError::new(
            ErrorKind::MinLength,
            "Must be at least {requiredLength} characters",
        )
        .param("requiredLength", 3)
        .param("actualLength", 1);

        assert_eq!(error.interpolate_message(), "Must be at least 3 characters");
        assert_eq!(error.to_string(), "[minlength] Must be at least 3 characters");
    }

    #[test]
    fn validation_errors_add_and_get() {
        let mut errors = ValidationErrors::new();
        errors.add("firstName", RuleError::new(ErrorKind::Required, "required"));
        errors.add("firstName", RuleError::new(ErrorKind::MinLength, "short"));
        errors.add("emailGroup", RuleError::new(ErrorKind::Match, "mismatch"));

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("firstName").unwrap().len(), 2);
        assert!(errors.has("emailGroup", &ErrorKind::Match));
        assert!(!errors.has("emailGroup", &ErrorKind::Required));
        assert_eq!(errors.paths(), vec!["emailGroup", "firstName"]);
    }

    #[test]
    fn validation_errors_merge_and_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut a = ValidationErrors::new();
        a.add("rating", RuleError::new(ErrorKind::Range, "out of range"));
        let mut b = ValidationErrors::new();
        b.add("phone", RuleError::new(ErrorKind::Required, "required"));

        a.merge(b);
        assert_eq!(a.len(), 2);
        assert!(a.into_result().is_err());
    }
}
