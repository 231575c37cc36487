use custform_validate::{ErrorKind, FieldValue, RuleError, SharedRule, ValidationRule};
use std::sync::Arc;

/// A leaf input: one value, its interaction state and its validators.
///
/// The failing set returned by [`Field::errors`] is recomputed on every
/// change to the value or to the validator list, so it always reflects the
/// current value under the current validators.
#[derive(Debug, Clone)]
pub struct Field {
    value: FieldValue,
    initial: FieldValue,
    touched: bool,
    dirty: bool,
    validators: Vec<SharedRule>,
    errors: Vec<RuleError>,
}

impl Field {
    /// Create a pristine, untouched field with no validators.
    pub fn new(value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        Self {
            initial: value.clone(),
            value,
            touched: false,
            dirty: false,
            validators: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Append a validator.
    pub fn with_validator(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.validators.push(Arc::new(rule));
        self.revalidate();
        self
    }

    /// Append already shared validators, keeping their order.
    pub fn with_validators(mut self, rules: impl IntoIterator<Item = SharedRule>) -> Self {
        self.validators.extend(rules);
        self.revalidate();
        self
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Programmatic update. Leaves the interaction state alone.
    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
        self.revalidate();
    }

    /// A user edit: updates the value and marks the field dirty.
    pub fn input(&mut self, value: impl Into<FieldValue>) {
        self.dirty = true;
        self.set_value(value);
    }

    /// The field received and lost focus.
    pub fn mark_touched(&mut self) {
        self.touched = true;
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_pristine(&self) -> bool {
        !self.dirty
    }

    /// Replace the active validator set and revalidate immediately.
    pub fn set_validators(&mut self, rules: Vec<SharedRule>) {
        self.validators = rules;
        self.revalidate();
    }

    pub fn clear_validators(&mut self) {
        self.set_validators(Vec::new());
    }

    pub fn validators(&self) -> &[SharedRule] {
        &self.validators
    }

    /// Failing rules, in validator declaration order.
    pub fn errors(&self) -> &[RuleError] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&RuleError> {
        self.errors.first()
    }

    pub fn has_error(&self, kind: &ErrorKind) -> bool {
        self.errors.iter().any(|e| &e.kind == kind)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Restore the initial value and forget all interaction.
    pub fn reset(&mut self) {
        self.value = self.initial.clone();
        self.touched = false;
        self.dirty = false;
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.errors = self
            .validators
            .iter()
            .filter_map(|rule| rule.validate(&self.value).err())
            .collect();
    }
}
