//! # custform validation
//!
//! Pure validation rules for form fields and groups.
//!
//! Field rules implement [`ValidationRule`] and see a single [`FieldValue`].
//! Group rules implement [`GroupValidationRule`] and read sibling controls
//! through [`GroupControls`], including their pristine state.
//!
//! ## Example
//!
//! ```rust
//! use custform_validate::prelude::*;
//!
//! let rules: Vec<SharedRule> = RuleSpec::build_all(&[
//!     RuleSpec::Required,
//!     RuleSpec::MinLength { min: 3 },
//! ]);
//!
//! let value = FieldValue::text("Al");
//! let failing: Vec<ErrorKind> = rules
//!     .iter()
//!     .filter_map(|rule| rule.validate(&value).err())
//!     .map(|e| e.kind)
//!     .collect();
//!
//! assert_eq!(failing, vec![ErrorKind::MinLength]);
//! ```
//!
//! ## Rules
//!
//! - `required` - value is not `null` and not empty text
//! - `minlength` / `maxlength` - text length bounds
//! - `email` - email address shape
//! - `range` - optional numeric range (absent is valid)
//! - `match` - two sibling fields agree once both have been edited

mod error;
mod rules;
mod traits;
mod value;

pub use error::{ErrorKind, RuleError, ValidationErrors};
pub use rules::*;
pub use traits::{
    ControlState, GroupControls, GroupValidationRule, RuleSpec, SharedGroupRule, SharedRule,
    ValidationRule,
};
pub use value::FieldValue;

/// Prelude module for validation
pub mod prelude {
    pub use crate::error::{ErrorKind, RuleError, ValidationErrors};
    pub use crate::rules::*;
    pub use crate::traits::{
        ControlState, GroupControls, GroupValidationRule, RuleSpec, SharedGroupRule, SharedRule,
        ValidationRule,
    };
    pub use crate::value::FieldValue;
}
