//! # custform
//!
//! A form validation engine: nested field/group/list trees with declarative
//! validators, cross-field rules, conditional requiredness and a resolver
//! that turns failures into display text.
//!
//! ## Example
//!
//! ```rust
//! use custform_core::prelude::*;
//! use custform_core::schema::{CustomerForm, PHONE};
//!
//! let mut customer = CustomerForm::new().unwrap();
//! assert!(customer.form().field(PHONE).unwrap().is_valid());
//!
//! customer.set_notification("text").unwrap();
//! assert!(customer.form().field(PHONE).unwrap().has_error(&ErrorKind::Required));
//!
//! assert_eq!(customer.add_address().unwrap(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`control`] - fields, groups and lists
//! - [`form`] - the root of a tree and every mutation of it
//! - [`rules`] - conditional validator sets
//! - [`messages`] - error message resolver
//! - [`schema`] - the customer form
//! - [`session`] - event handling with a debounced email message

pub mod config;
pub mod control;
pub mod debounce;
pub mod error;
pub mod form;
pub mod messages;
pub mod rules;
pub mod schema;
pub mod session;

pub use error::{FormError, Result};

/// Prelude module for custform
pub mod prelude {
    pub use crate::config::FormConfig;
    pub use crate::control::{Control, ControlList, ControlRef, Field, Group};
    pub use crate::error::{FormError, Result};
    pub use crate::form::Form;
    pub use crate::messages::{MessageResolver, UnmappedKindPolicy};
    pub use crate::rules::{Condition, ConditionalRule, RuleEngine};
    pub use crate::session::{FormEvent, FormSession};
    pub use custform_validate::prelude::*;
}
