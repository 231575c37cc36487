//! Core validation traits.

use crate::error::RuleError;
use crate::rules::{EmailRule, LengthRule, RangeRule, RequiredRule};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// A field-level rule.
///
/// Each rule validates a single value and returns a `RuleError` on failure.
///
/// ## Example
///
/// ```rust
/// use custform_validate::{FieldValue, RuleError, ValidationRule};
///
/// #[derive(Debug)]
/// struct PositiveRule;
///
/// impl ValidationRule for PositiveRule {
///     fn validate(&self, value: &FieldValue) -> Result<(), RuleError> {
///         match value.as_number() {
///             Some(n) if n <= 0.0 => Err(RuleError::new("positive", "Value must be positive")),
///             _ => Ok(()),
///         }
///     }
///
///     fn rule_name(&self) -> &'static str {
///         "positive"
///     }
/// }
///
/// assert!(PositiveRule.validate(&FieldValue::from(-1)).is_err());
/// assert!(PositiveRule.validate(&FieldValue::Null).is_ok());
/// ```
pub trait ValidationRule: Debug + Send + Sync {
    /// Validate the value against this rule.
    fn validate(&self, value: &FieldValue) -> Result<(), RuleError>;

    /// Get the rule name for logging and debugging.
    fn rule_name(&self) -> &'static str;
}

/// Read-only view of one control, as seen by a group-level rule.
#[derive(Debug, Clone, Copy)]
pub struct ControlState<'a> {
    pub value: &'a FieldValue,
    pub pristine: bool,
    pub touched: bool,
}

/// Sibling lookup handed to group-level rules.
pub trait GroupControls {
    /// State of the direct child field named `name`, if there is one.
    fn control(&self, name: &str) -> Option<ControlState<'_>>;
}

/// A cross-field rule evaluated against a group's children.
///
/// A failure attaches to the group itself, never to the children.
pub trait GroupValidationRule: Debug + Send + Sync {
    fn validate(&self, group: &dyn GroupControls) -> Result<(), RuleError>;

    fn rule_name(&self) -> &'static str;
}

/// Shared handle to a field rule, as stored on a field.
pub type SharedRule = Arc<dyn ValidationRule>;

/// Shared handle to a group rule.
pub type SharedGroupRule = Arc<dyn GroupValidationRule>;

/// Serializable description of a field rule.
///
/// Lets validator sets be declared as plain data (for conditional rules and
/// configuration) and turned into live rules with [`RuleSpec::into_rule`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleSpec {
    /// Non-empty value
    Required,
    /// Minimum text length
    MinLength { min: usize },
    /// Maximum text length
    MaxLength { max: usize },
    /// Email format
    Email,
    /// Optional numeric range
    Range { min: f64, max: f64 },
}

impl RuleSpec {
    /// Build the live rule.
    pub fn into_rule(self) -> SharedRule {
        match self {
            RuleSpec::Required => Arc::new(RequiredRule::new()),
            RuleSpec::MinLength { min } => Arc::new(LengthRule::min(min)),
            RuleSpec::MaxLength { max } => Arc::new(LengthRule::max(max)),
            RuleSpec::Email => Arc::new(EmailRule::new()),
            RuleSpec::Range { min, max } => Arc::new(RangeRule::new(min, max)),
        }
    }

    /// Build every rule in `specs`, keeping declaration order.
    pub fn build_all(specs: &[RuleSpec]) -> Vec<SharedRule> {
        specs.iter().cloned().map(RuleSpec::into_rule).collect()
    }
}
