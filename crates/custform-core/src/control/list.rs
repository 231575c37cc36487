use super::{join_path, Group};
use crate::error::{FormError, Result};
use custform_validate::ValidationErrors;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Builds a fresh group for a [`ControlList`].
pub type GroupTemplate = Arc<dyn Fn() -> Group + Send + Sync>;

/// Append-only sequence of groups built from one template.
#[derive(Clone)]
pub struct ControlList {
    groups: Vec<Group>,
    template: GroupTemplate,
}

impl ControlList {
    /// Create an empty list.
    pub fn new(template: impl Fn() -> Group + Send + Sync + 'static) -> Self {
        Self {
            groups: Vec::new(),
            template: Arc::new(template),
        }
    }

    /// Create a list already holding `count` template groups.
    pub fn seeded(template: impl Fn() -> Group + Send + Sync + 'static, count: usize) -> Self {
        let mut list = Self::new(template);
        for _ in 0..count {
            list.push_from_template();
        }
        list
    }

    /// Append a group with default values and no interaction history.
    /// Returns the new length.
    pub fn push_from_template(&mut self) -> usize {
        self.groups.push((self.template)());
        self.groups.len()
    }

    /// A group as the template would build it right now.
    pub fn template_group(&self) -> Group {
        (self.template)()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.groups.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn is_valid(&self) -> bool {
        self.groups.iter().all(Group::is_valid)
    }

    pub fn is_pristine(&self) -> bool {
        self.groups.iter().all(Group::is_pristine)
    }

    pub fn is_touched(&self) -> bool {
        self.groups.iter().any(Group::is_touched)
    }

    pub fn value(&self) -> Value {
        Value::Array(self.groups.iter().map(Group::value).collect())
    }

    pub(crate) fn update_validity(&mut self) {
        self.groups.iter_mut().for_each(Group::update_validity);
    }

    /// Resets every entry; the list keeps its length.
    pub(crate) fn reset(&mut self) {
        self.groups.iter_mut().for_each(Group::reset);
    }

    pub(crate) fn collect_errors(&self, prefix: &str, out: &mut ValidationErrors) {
        for (index, group) in self.groups.iter().enumerate() {
            group.collect_errors(&join_path(prefix, &index.to_string()), out);
        }
    }

    /// Patch entries index-wise. Entries past the current length are skipped.
    pub(crate) fn patch(
        &mut self,
        patch: &Value,
        prefix: &str,
        changed: &mut Vec<String>,
    ) -> Result<()> {
        let Value::Array(items) = patch else {
            return Err(FormError::Patch {
                path: prefix.to_string(),
                reason: "expected an array".to_string(),
            });
        };
        for (index, item) in items.iter().enumerate() {
            let path = join_path(prefix, &index.to_string());
            match self.groups.get_mut(index) {
                Some(group) => group.patch(item, &path, changed)?,
                None => tracing::warn!(path = %path, "Ignoring patch past end of list"),
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ControlList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlList")
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}
