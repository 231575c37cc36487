//! The form tree: fields, groups and lists of groups.
//!
//! Controls are addressed with dotted paths. Group children are named,
//! list entries are indexed: `emailGroup.email`, `addresses.0.city`.

mod field;
mod group;
mod list;

pub use field::Field;
pub use group::Group;
pub use list::{ControlList, GroupTemplate};

use crate::error::{FormError, Result};
use custform_validate::{FieldValue, ValidationErrors};
use serde_json::Value;

/// Any node of the form tree.
#[derive(Debug, Clone)]
pub enum Control {
    Field(Field),
    Group(Group),
    List(ControlList),
}

impl Control {
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Control::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Control::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ControlList> {
        match self {
            Control::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Control::Field(field) => field.is_valid(),
            Control::Group(group) => group.is_valid(),
            Control::List(list) => list.is_valid(),
        }
    }

    pub fn is_pristine(&self) -> bool {
        match self {
            Control::Field(field) => field.is_pristine(),
            Control::Group(group) => group.is_pristine(),
            Control::List(list) => list.is_pristine(),
        }
    }

    pub fn is_touched(&self) -> bool {
        match self {
            Control::Field(field) => field.is_touched(),
            Control::Group(group) => group.is_touched(),
            Control::List(list) => list.is_touched(),
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Control::Field(field) => field.value().to_json(),
            Control::Group(group) => group.value(),
            Control::List(list) => list.value(),
        }
    }

    pub(crate) fn reset(&mut self) {
        match self {
            Control::Field(field) => field.reset(),
            Control::Group(group) => group.reset(),
            Control::List(list) => list.reset(),
        }
    }

    pub(crate) fn collect_errors(&self, path: &str, out: &mut ValidationErrors) {
        match self {
            Control::Field(field) => {
                if !field.is_valid() {
                    out.add_all(path, field.errors().iter().cloned());
                }
            }
            Control::Group(group) => group.collect_errors(path, out),
            Control::List(list) => list.collect_errors(path, out),
        }
    }

    pub(crate) fn patch(
        &mut self,
        patch: &Value,
        path: &str,
        changed: &mut Vec<String>,
    ) -> Result<()> {
        match self {
            Control::Field(field) => {
                let value = FieldValue::from_json(patch).ok_or_else(|| FormError::Patch {
                    path: path.to_string(),
                    reason: "expected a scalar value".to_string(),
                })?;
                if field.value() != &value {
                    field.set_value(value);
                    changed.push(path.to_string());
                }
                Ok(())
            }
            Control::Group(group) => group.patch(patch, path, changed),
            Control::List(list) => list.patch(patch, path, changed),
        }
    }
}

impl From<Field> for Control {
    fn from(field: Field) -> Self {
        Control::Field(field)
    }
}

impl From<Group> for Control {
    fn from(group: Group) -> Self {
        Control::Group(group)
    }
}

impl From<ControlList> for Control {
    fn from(list: ControlList) -> Self {
        Control::List(list)
    }
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Split a dotted path. `None` if the path or any of its segments is empty,
/// so every control has exactly one spelling.
fn segments(path: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        None
    } else {
        Some(parts)
    }
}

/// Borrowed view of a node reached by path.
///
/// List entries are plain groups rather than [`Control`]s, so lookups hand
/// out this view instead of `&Control`.
#[derive(Debug, Clone, Copy)]
pub enum ControlRef<'a> {
    Field(&'a Field),
    Group(&'a Group),
    List(&'a ControlList),
}

impl<'a> ControlRef<'a> {
    fn of(control: &'a Control) -> Self {
        match control {
            Control::Field(field) => ControlRef::Field(field),
            Control::Group(group) => ControlRef::Group(group),
            Control::List(list) => ControlRef::List(list),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ControlRef::Field(_) => "field",
            ControlRef::Group(_) => "group",
            ControlRef::List(_) => "list",
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            ControlRef::Field(field) => field.is_valid(),
            ControlRef::Group(group) => group.is_valid(),
            ControlRef::List(list) => list.is_valid(),
        }
    }

    pub fn value(&self) -> Value {
        match self {
            ControlRef::Field(field) => field.value().to_json(),
            ControlRef::Group(group) => group.value(),
            ControlRef::List(list) => list.value(),
        }
    }
}

pub(crate) enum ControlMut<'a> {
    Field(&'a mut Field),
    Group(&'a mut Group),
    List(&'a mut ControlList),
}

impl<'a> ControlMut<'a> {
    fn of(control: &'a mut Control) -> Self {
        match control {
            Control::Field(field) => ControlMut::Field(field),
            Control::Group(group) => ControlMut::Group(group),
            Control::List(list) => ControlMut::List(list),
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            ControlMut::Field(_) => "field",
            ControlMut::Group(_) => "group",
            ControlMut::List(_) => "list",
        }
    }
}

/// Look up a descendant of `root` by dotted path.
pub(crate) fn find<'a>(root: &'a Group, path: &str) -> Result<ControlRef<'a>> {
    let not_found = || FormError::NotFound(path.to_string());
    let mut current = ControlRef::Group(root);
    for part in segments(path).ok_or_else(not_found)? {
        current = match current {
            ControlRef::Group(group) => group.get(part).map(ControlRef::of),
            ControlRef::List(list) => part
                .parse::<usize>()
                .ok()
                .and_then(|i| list.get(i))
                .map(ControlRef::Group),
            ControlRef::Field(_) => None,
        }
        .ok_or_else(not_found)?;
    }
    Ok(current)
}

/// Mutable lookup by dotted path.
pub(crate) fn find_mut<'a>(root: &'a mut Group, path: &str) -> Result<ControlMut<'a>> {
    let not_found = || FormError::NotFound(path.to_string());
    let mut current = ControlMut::Group(root);
    for part in segments(path).ok_or_else(not_found)? {
        current = match current {
            ControlMut::Group(group) => group.get_mut(part).map(ControlMut::of),
            ControlMut::List(list) => match part.parse::<usize>() {
                Ok(index) => list.get_mut(index).map(ControlMut::Group),
                Err(_) => None,
            },
            ControlMut::Field(_) => None,
        }
        .ok_or_else(not_found)?;
    }
    Ok(current)
}

/// Re-run the cross-field rules of every group on the way to `path`,
/// innermost first.
pub(crate) fn refresh_ancestors(root: &mut Group, path: &str) {
    let parts = segments(path).unwrap_or_default();
    refresh_group(root, &parts);
}

fn refresh_group(group: &mut Group, parts: &[&str]) {
    if let Some((first, rest)) = parts.split_first() {
        if !rest.is_empty() {
            match group.get_mut(first) {
                Some(Control::Group(child)) => refresh_group(child, rest),
                Some(Control::List(list)) => {
                    if let Some((index, rest)) = rest.split_first() {
                        let entry = index.parse::<usize>().ok().and_then(|i| list.get_mut(i));
                        if let Some(entry) = entry {
                            refresh_group(entry, rest);
                        }
                    }
                }
                _ => {}
            }
        }
    }
    group.revalidate_own();
}

#[cfg(test)]
mod tests {
    use super::*;
    use custform_validate::{ErrorKind, MatchRule};

    fn tree() -> Group {
        let entry = || Group::new().with_control("city", Field::new(""));
        Group::new()
            .with_control("name", Field::new(""))
            .with_control(
                "emailGroup",
                Group::new()
                    .with_control("email", Field::new(""))
                    .with_control("confirmEmail", Field::new(""))
                    .with_validator(MatchRule::email()),
            )
            .with_control("addresses", ControlList::seeded(entry, 2))
    }

    #[test]
    fn join_paths() {
        assert_eq!(join_path("", "name"), "name");
        assert_eq!(join_path("addresses.0", "city"), "addresses.0.city");
    }

    #[test]
    fn find_by_path() {
        let root = tree();
        assert!(matches!(find(&root, "name"), Ok(ControlRef::Field(_))));
        assert!(matches!(find(&root, "emailGroup"), Ok(ControlRef::Group(_))));
        assert!(matches!(find(&root, "addresses"), Ok(ControlRef::List(_))));
        assert!(matches!(find(&root, "addresses.1"), Ok(ControlRef::Group(_))));
        assert!(matches!(find(&root, "addresses.1.city"), Ok(ControlRef::Field(_))));
    }

    #[test]
    fn find_missing_paths() {
        let root = tree();
        for path in [
            "",
            "nope",
            "addresses.2",
            "addresses.x",
            "name.inner",
            "emailGroup.phone",
            "name.",
            ".name",
            "emailGroup..email",
            "addresses.0..city",
        ] {
            assert!(
                matches!(find(&root, path), Err(FormError::NotFound(_))),
                "{path}"
            );
        }
    }

    #[test]
    fn refresh_runs_group_rules_on_the_path() {
        let mut root = tree();
        for (name, value) in [("email", "a@b.com"), ("confirmEmail", "x@y.com")] {
            let path = format!("emailGroup.{name}");
            if let Ok(ControlMut::Field(field)) = find_mut(&mut root, &path) {
                field.input(value);
            }
        }
        let group = root.get("emailGroup").and_then(Control::as_group).unwrap();
        assert!(group.errors().is_empty());

        refresh_ancestors(&mut root, "emailGroup.confirmEmail");
        let group = root.get("emailGroup").and_then(Control::as_group).unwrap();
        assert_eq!(group.errors()[0].kind, ErrorKind::Match);
    }
}
