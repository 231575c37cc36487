use super::{join_path, Control, Field};
use crate::error::{FormError, Result};
use custform_validate::{
    ControlState, GroupControls, GroupValidationRule, RuleError, SharedGroupRule,
    ValidationErrors,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Named, ordered collection of controls with optional cross-field rules.
///
/// Group-level failures are kept on the group itself; the children's own
/// failing sets are never touched by a group rule.
#[derive(Debug, Clone, Default)]
pub struct Group {
    controls: Vec<(String, Control)>,
    validators: Vec<SharedGroupRule>,
    errors: Vec<RuleError>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child control. A later child with the same name replaces the
    /// earlier one in place.
    pub fn with_control(mut self, name: impl Into<String>, control: impl Into<Control>) -> Self {
        let name = name.into();
        let control = control.into();
        match self.controls.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = control,
            None => self.controls.push((name, control)),
        }
        self.revalidate_own();
        self
    }

    /// Append a cross-field rule.
    pub fn with_validator(mut self, rule: impl GroupValidationRule + 'static) -> Self {
        self.validators.push(Arc::new(rule));
        self.revalidate_own();
        self
    }

    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Direct child field named `name`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.get(name).and_then(Control::as_field)
    }

    /// Child names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.controls.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Failing group-level rules.
    pub fn errors(&self) -> &[RuleError] {
        &self.errors
    }

    /// Valid when the group's own rules pass and every child is valid.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.controls.iter().all(|(_, c)| c.is_valid())
    }

    /// Pristine while no descendant field has been edited.
    pub fn is_pristine(&self) -> bool {
        self.controls.iter().all(|(_, c)| c.is_pristine())
    }

    pub fn is_touched(&self) -> bool {
        self.controls.iter().any(|(_, c)| c.is_touched())
    }

    /// Snapshot of all child values as a JSON object.
    pub fn value(&self) -> Value {
        let map: Map<String, Value> = self
            .controls
            .iter()
            .map(|(n, c)| (n.clone(), c.value()))
            .collect();
        Value::Object(map)
    }

    /// Re-run this group's own cross-field rules.
    pub(crate) fn revalidate_own(&mut self) {
        let errors = self
            .validators
            .iter()
            .filter_map(|rule| rule.validate(&*self).err())
            .collect();
        self.errors = errors;
    }

    /// Re-run group rules across the whole subtree, children first.
    pub(crate) fn update_validity(&mut self) {
        for (_, control) in &mut self.controls {
            match control {
                Control::Group(group) => group.update_validity(),
                Control::List(list) => list.update_validity(),
                Control::Field(_) => {}
            }
        }
        self.revalidate_own();
    }

    pub(crate) fn reset(&mut self) {
        for (_, control) in &mut self.controls {
            control.reset();
        }
        self.revalidate_own();
    }

    pub(crate) fn collect_errors(&self, prefix: &str, out: &mut ValidationErrors) {
        if !self.errors.is_empty() {
            out.add_all(prefix, self.errors.iter().cloned());
        }
        for (name, control) in &self.controls {
            control.collect_errors(&join_path(prefix, name), out);
        }
    }

    /// Programmatically set the fields named in `patch`.
    ///
    /// Keys without a matching child are skipped. Paths of fields whose value
    /// actually changed are appended to `changed`.
    pub(crate) fn patch(
        &mut self,
        patch: &Value,
        prefix: &str,
        changed: &mut Vec<String>,
    ) -> Result<()> {
        let Value::Object(entries) = patch else {
            return Err(FormError::Patch {
                path: prefix.to_string(),
                reason: "expected an object".to_string(),
            });
        };
        for (name, value) in entries {
            let path = join_path(prefix, name);
            match self.get_mut(name) {
                Some(control) => control.patch(value, &path, changed)?,
                None => tracing::warn!(path = %path, "Ignoring patch for unknown control"),
            }
        }
        self.revalidate_own();
        Ok(())
    }
}

impl GroupControls for Group {
    fn control(&self, name: &str) -> Option<ControlState<'_>> {
        self.field(name).map(|field| ControlState {
            value: field.value(),
            pristine: field.is_pristine(),
            touched: field.is_touched(),
        })
    }
}
