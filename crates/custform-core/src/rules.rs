//! Conditional validation.
//!
//! A [`ConditionalRule`] declares "when field X changes, recompute the
//! validator set of field Y from X's latest value". Rules are plain data so
//! they can be inspected, serialized and tested without a live change stream.
//!
//! # Example
//!
//! ```rust
//! use custform_core::rules::{Condition, ConditionalRule};
//! use custform_validate::RuleSpec;
//!
//! let rule = ConditionalRule::new("notification", "phone")
//!     .when(Condition::Equals("text".into()))
//!     .then(vec![RuleSpec::Required]);
//!
//! assert_eq!(rule.validators_for(&"text".into()), &[RuleSpec::Required]);
//! assert!(rule.validators_for(&"email".into()).is_empty());
//! ```

use crate::control::{self, ControlMut, Group};
use crate::error::{FormError, Result};
use custform_validate::{FieldValue, RuleSpec};
use serde::{Deserialize, Serialize};

/// Predicate over the source field's latest value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Equals(FieldValue),
    OneOf(Vec<FieldValue>),
}

impl Condition {
    pub fn holds(&self, value: &FieldValue) -> bool {
        match self {
            Condition::Equals(expected) => expected == value,
            Condition::OneOf(options) => options.contains(value),
        }
    }
}

/// Validator set of `target`, chosen from the value of `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub source: String,
    pub target: String,
    pub when: Condition,
    /// Validators while the condition holds
    #[serde(default)]
    pub then: Vec<RuleSpec>,
    /// Validators otherwise
    #[serde(default)]
    pub otherwise: Vec<RuleSpec>,
}

impl ConditionalRule {
    /// A rule that leaves `target` without validators until configured.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            when: Condition::OneOf(Vec::new()),
            then: Vec::new(),
            otherwise: Vec::new(),
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }

    pub fn then(mut self, specs: Vec<RuleSpec>) -> Self {
        self.then = specs;
        self
    }

    pub fn otherwise(mut self, specs: Vec<RuleSpec>) -> Self {
        self.otherwise = specs;
        self
    }

    /// The validator set `target` should carry for a source value.
    pub fn validators_for(&self, value: &FieldValue) -> &[RuleSpec] {
        if self.when.holds(value) {
            &self.then
        } else {
            &self.otherwise
        }
    }
}

/// The declared rules of one form.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<ConditionalRule>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rule: ConditionalRule) {
        self.rules.push(rule);
    }

    /// React to a value change at `path`: every rule sourced there re-derives
    /// its target's validators, which revalidates the target immediately.
    pub fn on_change(&self, root: &mut Group, path: &str) -> Result<()> {
        for rule in self.rules.iter().filter(|r| r.source == path) {
            Self::apply(rule, root)?;
        }
        Ok(())
    }

    /// Apply every rule to the current state, with no change event.
    pub fn apply_all(&self, root: &mut Group) -> Result<()> {
        for rule in &self.rules {
            Self::apply(rule, root)?;
        }
        Ok(())
    }

    fn apply(rule: &ConditionalRule, root: &mut Group) -> Result<()> {
        let source = match control::find(root, &rule.source)? {
            control::ControlRef::Field(field) => field.value().clone(),
            other => {
                return Err(FormError::WrongKind {
                    path: rule.source.clone(),
                    expected: "field",
                    actual: other.kind_name(),
                })
            }
        };
        let specs = rule.validators_for(&source);

        match control::find_mut(root, &rule.target)? {
            ControlMut::Field(target) => {
                target.set_validators(RuleSpec::build_all(specs));
                tracing::debug!(
                    source = %rule.source,
                    target = %rule.target,
                    value = %source,
                    validators = specs.len(),
                    "Replaced conditional validators"
                );
            }
            other => {
                return Err(FormError::WrongKind {
                    path: rule.target.clone(),
                    expected: "field",
                    actual: other.kind_name(),
                })
            }
        }
        control::refresh_ancestors(root, &rule.target);
        Ok(())
    }
}
