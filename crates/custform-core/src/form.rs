//! The root of a form tree.

use crate::control::{self, ControlList, ControlMut, ControlRef, Field, Group};
use crate::error::{FormError, Result};
use crate::rules::{ConditionalRule, RuleEngine};
use custform_validate::{FieldValue, SharedRule, ValidationErrors};
use serde_json::Value;

/// A root group together with its declared conditional rules.
///
/// All mutation goes through the form, which keeps every derived state
/// current: the edited field revalidates itself, conditional rules sourced at
/// the edited path fire, and the cross-field rules of every enclosing group
/// are re-run.
#[derive(Debug, Clone)]
pub struct Form {
    root: Group,
    rules: RuleEngine,
}

impl Form {
    pub fn new(root: Group) -> Self {
        Self {
            root,
            rules: RuleEngine::new(),
        }
    }

    /// Declare a conditional rule and apply it to the current state.
    pub fn with_rule(mut self, rule: ConditionalRule) -> Result<Self> {
        self.rules.add(rule);
        self.rules.apply_all(&mut self.root)?;
        Ok(self)
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn get(&self, path: &str) -> Result<ControlRef<'_>> {
        control::find(&self.root, path)
    }

    pub fn field(&self, path: &str) -> Result<&Field> {
        match self.get(path)? {
            ControlRef::Field(field) => Ok(field),
            other => Err(wrong_kind(path, "field", other.kind_name())),
        }
    }

    pub fn group(&self, path: &str) -> Result<&Group> {
        match self.get(path)? {
            ControlRef::Group(group) => Ok(group),
            other => Err(wrong_kind(path, "group", other.kind_name())),
        }
    }

    pub fn list(&self, path: &str) -> Result<&ControlList> {
        match self.get(path)? {
            ControlRef::List(list) => Ok(list),
            other => Err(wrong_kind(path, "list", other.kind_name())),
        }
    }

    /// Programmatic update; the field stays pristine.
    pub fn set_value(&mut self, path: &str, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();
        self.update_field(path, |field| field.set_value(value))?;
        self.rules.on_change(&mut self.root, path)
    }

    /// A user edit; the field becomes dirty.
    pub fn input(&mut self, path: &str, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();
        self.update_field(path, |field| field.input(value))?;
        self.rules.on_change(&mut self.root, path)
    }

    /// The field received and lost focus.
    pub fn touch(&mut self, path: &str) -> Result<()> {
        self.update_field(path, Field::mark_touched)
    }

    /// Replace a field's validators; it revalidates immediately.
    pub fn set_validators(&mut self, path: &str, rules: Vec<SharedRule>) -> Result<()> {
        self.update_field(path, |field| field.set_validators(rules))
    }

    /// Append a template group to the list at `path`. Returns the new length.
    pub fn push_group(&mut self, path: &str) -> Result<usize> {
        let len = match control::find_mut(&mut self.root, path)? {
            ControlMut::List(list) => list.push_from_template(),
            other => return Err(wrong_kind(path, "list", other.kind_name())),
        };
        control::refresh_ancestors(&mut self.root, path);
        Ok(len)
    }

    /// Programmatically set the fields named in `patch`, a JSON object
    /// mirroring the tree. Fields not mentioned keep their value; unknown
    /// keys are skipped. Nothing is marked dirty.
    pub fn patch_value(&mut self, patch: &Value) -> Result<()> {
        let mut changed = Vec::new();
        let result = self.root.patch(patch, "", &mut changed);
        for path in &changed {
            self.rules.on_change(&mut self.root, path)?;
        }
        self.root.update_validity();
        result
    }

    /// Restore every field to its initial value with no interaction history.
    /// Lists keep their length.
    pub fn reset(&mut self) -> Result<()> {
        self.root.reset();
        self.rules.apply_all(&mut self.root)?;
        self.root.update_validity();
        Ok(())
    }

    /// Snapshot of every value in the tree.
    pub fn value(&self) -> Value {
        self.root.value()
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }

    /// Every failing rule in the tree, keyed by control path.
    pub fn errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        self.root.collect_errors("", &mut errors);
        errors
    }

    /// Hand the current snapshot off for submission.
    pub fn save(&self) -> Result<Value> {
        let value = self.value();
        tracing::info!(
            valid = self.is_valid(),
            "Saved: {}",
            serde_json::to_string(&value)?
        );
        Ok(value)
    }

    fn update_field(&mut self, path: &str, update: impl FnOnce(&mut Field)) -> Result<()> {
        match control::find_mut(&mut self.root, path)? {
            ControlMut::Field(field) => update(field),
            other => return Err(wrong_kind(path, "field", other.kind_name())),
        }
        control::refresh_ancestors(&mut self.root, path);
        Ok(())
    }
}

fn wrong_kind(path: &str, expected: &'static str, actual: &'static str) -> FormError {
    FormError::WrongKind {
        path: path.to_string(),
        expected,
        actual,
    }
}
