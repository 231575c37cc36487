use thiserror::Error;

/// Operational errors.
///
/// Validation failures are never reported through this type; they live on
/// the controls as [`RuleError`](custform_validate::RuleError) data.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("No control at path: {0}")]
    NotFound(String),

    #[error("Control at {path} is a {actual}, expected a {expected}")]
    WrongKind {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Cannot patch {path}: {reason}")]
    Patch { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FormError>;
