//! Field-level rules.
//!
//! Every rule here except [`RequiredRule`] treats an empty value as valid, so
//! an optional field only fails once the user actually types something.

use crate::error::{ErrorKind, RuleError};
use crate::traits::ValidationRule;
use crate::value::FieldValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

const EMAIL_MAX_LENGTH: usize = 254;
const EMAIL_LOCAL_PART_MAX_LENGTH: usize = 64;

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
        ).unwrap()
    })
}

/// Required (non-empty) validation rule.
///
/// Fails on `Null` and empty text. Numbers and booleans, `false` included,
/// count as present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequiredRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RequiredRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a required rule with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl ValidationRule for RequiredRule {
    fn validate(&self, value: &FieldValue) -> Result<(), RuleError> {
        if !value.is_empty() {
            Ok(())
        } else {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| "This field is required".to_string());
            Err(RuleError::new(ErrorKind::Required, message))
        }
    }

    fn rule_name(&self) -> &'static str {
        "required"
    }
}

/// Text length validation rule.
///
/// A too-short value fails with `minlength`, a too-long one with
/// `maxlength`. Both carry `requiredLength` and `actualLength` params.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LengthRule {
    /// Minimum length (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum length (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LengthRule {
    /// Create a length rule with min and max bounds.
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            message: None,
        }
    }

    /// Create a length rule with only a minimum.
    pub fn min(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
            message: None,
        }
    }

    /// Create a length rule with only a maximum.
    pub fn max(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ValidationRule for LengthRule {
    fn validate(&self, value: &FieldValue) -> Result<(), RuleError> {
        if value.is_empty() {
            return Ok(());
        }
        let Some(len) = value.len() else {
            return Ok(());
        };

        if let Some(min) = self.min {
            if len < min {
                let message = self.message.clone().unwrap_or_else(|| {
                    "Must be at least {requiredLength} characters".to_string()
                });
                return Err(RuleError::new(ErrorKind::MinLength, message)
                    .param("requiredLength", min)
                    .param("actualLength", len));
            }
        }

        if let Some(max) = self.max {
            if len > max {
                let message = self.message.clone().unwrap_or_else(|| {
                    "Must be at most {requiredLength} characters".to_string()
                });
                return Err(RuleError::new(ErrorKind::MaxLength, message)
                    .param("requiredLength", max)
                    .param("actualLength", len));
            }
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "length"
    }
}

/// Email format validation rule.
///
/// Empty values pass; pair with [`RequiredRule`] to demand an address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmailRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EmailRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an email rule with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    fn is_valid_address(candidate: &str) -> bool {
        if candidate.len() > EMAIL_MAX_LENGTH {
            return false;
        }
        match candidate.find('@') {
            Some(at) if at <= EMAIL_LOCAL_PART_MAX_LENGTH => email_regex().is_match(candidate),
            _ => false,
        }
    }
}

impl ValidationRule for EmailRule {
    fn validate(&self, value: &FieldValue) -> Result<(), RuleError> {
        if value.is_empty() {
            return Ok(());
        }
        let valid = match value {
            FieldValue::Text(s) => Self::is_valid_address(s),
            other => Self::is_valid_address(&other.to_string()),
        };
        if valid {
            Ok(())
        } else {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| "Invalid email format".to_string());
            Err(RuleError::new(ErrorKind::Email, message))
        }
    }

    fn rule_name(&self) -> &'static str {
        "email"
    }
}

/// Optional numeric range rule.
///
/// `Null` passes: absence is valid. A present value fails with `range` when
/// it is not numeric or lies outside `[min, max]`. Text is coerced with
/// [`FieldValue::as_number`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeRule {
    /// Minimum value (inclusive)
    pub min: f64,
    /// Maximum value (inclusive)
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RangeRule {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ValidationRule for RangeRule {
    fn validate(&self, value: &FieldValue) -> Result<(), RuleError> {
        if matches!(value, FieldValue::Null) {
            return Ok(());
        }
        match value.as_number() {
            Some(n) if n >= self.min && n <= self.max => Ok(()),
            actual => {
                let message = self
                    .message
                    .clone()
                    .unwrap_or_else(|| "Value must be between {min} and {max}".to_string());
                Err(RuleError::new(ErrorKind::Range, message)
                    .param("min", self.min)
                    .param("max", self.max)
                    .param("actual", actual))
            }
        }
    }

    fn rule_name(&self) -> &'static str {
        "range"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::text(s)
    }

    #[test]
    fn required_rule() {
        let rule = RequiredRule::new();
        assert!(rule.validate(&text("value")).is_ok());
        assert!(rule.validate(&text(" ")).is_ok());
        assert!(rule.validate(&FieldValue::Bool(false)).is_ok());
        assert!(rule.validate(&FieldValue::Number(0.0)).is_ok());

        let err = rule.validate(&text("")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Required);
        assert!(rule.validate(&FieldValue::Null).is_err());
    }

    #[test]
    fn required_rule_custom_message() {
        let rule = RequiredRule::with_message("Phone is required");
        let err = rule.validate(&FieldValue::Null).unwrap_err();
        assert_eq!(err.message, "Phone is required");
    }

    #[test]
    fn min_length_rule() {
        let rule = LengthRule::min(3);
        assert!(rule.validate(&text("abc")).is_ok());
        assert!(rule.validate(&text("")).is_ok());
        assert!(rule.validate(&FieldValue::Null).is_ok());

        let err = rule.validate(&text("ab")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MinLength);
        assert_eq!(err.params["requiredLength"], 3);
        assert_eq!(err.params["actualLength"], 2);
        assert_eq!(err.interpolate_message(), "Must be at least 3 characters");
    }

    #[test]
    fn max_length_rule() {
        let rule = LengthRule::max(50);
        assert!(rule.validate(&text(&"x".repeat(50))).is_ok());

        let err = rule.validate(&text(&"x".repeat(51))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MaxLength);
        assert_eq!(err.params["actualLength"], 51);
    }

    #[test]
    fn length_rule_ignores_non_text() {
        let rule = LengthRule::new(3, 5);
        assert!(rule.validate(&FieldValue::Number(1.0)).is_ok());
        assert!(rule.validate(&FieldValue::Bool(true)).is_ok());
    }

    #[test]
    fn email_rule_valid() {
        let rule = EmailRule::new();
        assert!(rule.validate(&text("a@b.com")).is_ok());
        assert!(rule.validate(&text("user.name+tag@domain.co.uk")).is_ok());
        assert!(rule.validate(&text("local@host")).is_ok());
        assert!(rule.validate(&text("")).is_ok());
    }

    #[test]
    fn email_rule_invalid() {
        let rule = EmailRule::new();
        for bad in ["invalid", "@domain.com", "user@", "a@b..com", "a b@c.com", ".a@b.com"] {
            let err = rule.validate(&text(bad)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Email, "{bad}");
        }
    }

    #[test]
    fn email_rule_length_limits() {
        let rule = EmailRule::new();
        let long_local = format!("{}@b.com", "a".repeat(65));
        assert!(rule.validate(&text(&long_local)).is_err());

        let ok_local = format!("{}@b.com", "a".repeat(64));
        assert!(rule.validate(&text(&ok_local)).is_ok());

        let long_label = format!("a@{}.com", "b".repeat(64));
        assert!(rule.validate(&text(&long_label)).is_err());
    }

    #[test]
    fn range_rule() {
        let rule = RangeRule::new(1.0, 5.0);
        assert!(rule.validate(&FieldValue::Null).is_ok());
        assert!(rule.validate(&FieldValue::from(3)).is_ok());
        assert!(rule.validate(&FieldValue::from(1)).is_ok());
        assert!(rule.validate(&FieldValue::from(5)).is_ok());
        assert!(rule.validate(&text("4")).is_ok());

        for bad in [FieldValue::from(0), FieldValue::from(6), text("abc"), text("")] {
            let err = rule.validate(&bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Range, "{bad:?}");
        }
    }

    #[test]
    fn range_rule_message() {
        let err = RangeRule::new(1.0, 5.0)
            .validate(&FieldValue::from(9))
            .unwrap_err();
        assert_eq!(err.interpolate_message(), "Value must be between 1.0 and 5.0");
        assert_eq!(err.params["actual"], 9.0);
    }

    #[test]
    fn rule_serialization_roundtrip() {
        let rule = LengthRule::new(3, 50).with_message("Custom message");
        let json = serde_json::to_string(&rule).unwrap();
        let parsed: LengthRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, parsed);
    }
}
