//! Built-in validation rules.

mod field_rules;
mod group_rules;

pub use field_rules::*;
pub use group_rules::*;
