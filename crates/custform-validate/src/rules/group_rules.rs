//! Cross-field rules evaluated against a group.

use crate::error::{ErrorKind, RuleError};
use crate::traits::{GroupControls, GroupValidationRule};
use serde::{Deserialize, Serialize};

/// Two sibling fields must hold the same value.
///
/// The check is suppressed while either field is still pristine, so an
/// address typed into the first field does not flag a mismatch before the
/// user has reached the confirmation field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRule {
    pub field: String,
    pub confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MatchRule {
    pub fn new(field: impl Into<String>, confirm: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            confirm: confirm.into(),
            message: None,
        }
    }

    /// The `email` / `confirmEmail` pair.
    pub fn email() -> Self {
        Self::new("email", "confirmEmail")
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl GroupValidationRule for MatchRule {
    fn validate(&self, group: &dyn GroupControls) -> Result<(), RuleError> {
        let field = group.control(&self.field);
        let confirm = group.control(&self.confirm);

        if field.is_some_and(|c| c.pristine) || confirm.is_some_and(|c| c.pristine) {
            return Ok(());
        }
        if field.map(|c| c.value) == confirm.map(|c| c.value) {
            return Ok(());
        }

        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "{field} and {confirm} do not match".to_string());
        Err(RuleError::new(ErrorKind::Match, message)
            .param("field", &self.field)
            .param("confirm", &self.confirm))
    }

    fn rule_name(&self) -> &'static str {
        "match"
    }
}
