//! Display text for failing fields.

use crate::config::FormConfig;
use crate::control::Field;
use custform_validate::ErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The stock lookup table.
pub fn default_messages() -> BTreeMap<ErrorKind, String> {
    BTreeMap::from([
        (
            ErrorKind::Required,
            "Please enter your email address".to_string(),
        ),
        (
            ErrorKind::Email,
            "Please enter a valid email address".to_string(),
        ),
    ])
}

/// Fallback for error kinds missing from the lookup table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedKindPolicy {
    /// Show nothing
    Empty,
    /// Show the kind tag itself, e.g. `range`
    KindName,
    /// Show the failing rule's own interpolated message
    #[default]
    RuleMessage,
}

/// Maps a field's first failing rule to display text.
#[derive(Debug, Clone)]
pub struct MessageResolver {
    messages: BTreeMap<ErrorKind, String>,
    unmapped: UnmappedKindPolicy,
}

impl Default for MessageResolver {
    fn default() -> Self {
        Self {
            messages: default_messages(),
            unmapped: UnmappedKindPolicy::default(),
        }
    }
}

impl MessageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FormConfig) -> Self {
        Self {
            messages: config.messages.clone(),
            unmapped: config.unmapped,
        }
    }

    /// Add or replace the text for one kind.
    pub fn with_message(mut self, kind: ErrorKind, text: impl Into<String>) -> Self {
        self.messages.insert(kind, text.into());
        self
    }

    pub fn with_unmapped(mut self, policy: UnmappedKindPolicy) -> Self {
        self.unmapped = policy;
        self
    }

    /// Text for `field`, or an empty string.
    ///
    /// Nothing is shown until the user has touched or edited the field, nor
    /// while it is valid. Otherwise the first failing rule, in validator
    /// declaration order, picks the message.
    pub fn resolve(&self, field: &Field) -> String {
        if !field.is_touched() && !field.is_dirty() {
            return String::new();
        }
        let Some(error) = field.first_error() else {
            return String::new();
        };
        match self.messages.get(&error.kind) {
            Some(text) => text.clone(),
            None => match self.unmapped {
                UnmappedKindPolicy::Empty => String::new(),
                UnmappedKindPolicy::KindName => error.kind.to_string(),
                UnmappedKindPolicy::RuleMessage => error.interpolate_message(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custform_validate::{EmailRule, FieldValue, LengthRule, RangeRule, RequiredRule};

    fn email_field() -> Field {
        Field::new("")
            .with_validator(RequiredRule::new())
            .with_validator(EmailRule::new())
    }

    #[test]
    fn silent_before_interaction() {
        let field = email_field();
        assert!(!field.is_valid());
        assert_eq!(MessageResolver::new().resolve(&field), "");
    }

    #[test]
    fn touched_required_failure() {
        let mut field = email_field();
        field.mark_touched();
        assert_eq!(
            MessageResolver::new().resolve(&field),
            "Please enter your email address"
        );
    }

    #[test]
    fn dirty_email_failure() {
        let mut field = email_field();
        field.input("not-an-email");
        assert_eq!(
            MessageResolver::new().resolve(&field),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn valid_field_has_no_message() {
        let mut field = email_field();
        field.input("a@b.com");
        field.mark_touched();
        assert_eq!(MessageResolver::new().resolve(&field), "");
    }

    #[test]
    fn first_failing_rule_wins() {
        let mut field = Field::new("")
            .with_validator(EmailRule::new())
            .with_validator(LengthRule::max(3));
        field.input("abcd");
        assert_eq!(
            MessageResolver::new().resolve(&field),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn unmapped_kind_policies() {
        let mut field = Field::new(FieldValue::Null).with_validator(RangeRule::new(1.0, 5.0));
        field.input(9);

        let resolver = MessageResolver::new();
        assert_eq!(resolver.resolve(&field), "Value must be between 1.0 and 5.0");
        assert_eq!(
            resolver.clone().with_unmapped(UnmappedKindPolicy::KindName).resolve(&field),
            "range"
        );
        assert_eq!(
            resolver.with_unmapped(UnmappedKindPolicy::Empty).resolve(&field),
            ""
        );
    }

    #[test]
    fn table_is_extensible() {
        let mut field = Field::new("").with_validator(LengthRule::min(3));
        field.input("ab");
        let resolver = MessageResolver::new().with_message(ErrorKind::MinLength, "Too short");
        assert_eq!(resolver.resolve(&field), "Too short");
    }

    #[test]
    fn from_config_uses_table_and_policy() {
        let config = FormConfig {
            messages: BTreeMap::new(),
            unmapped: UnmappedKindPolicy::KindName,
            ..FormConfig::default()
        };
        let mut field = Field::new("").with_validator(RequiredRule::new());
        field.mark_touched();
        assert_eq!(MessageResolver::from_config(&config).resolve(&field), "required");
    }
}
