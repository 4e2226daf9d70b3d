//! Field-level validation shared by every entity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A violated validation rule: which field, and why.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct CheckError {
    pub field: String,
    pub message: String,
}

impl CheckError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Capability of checking an entity's own fields.
///
/// Implementations are pure: they look only at the entity's current values,
/// never at the store. Rules run in field-declaration order and the first
/// violation is returned.
pub trait Validatable {
    fn check_data(&self) -> Result<(), CheckError>;
}

/// Fails with `message` when `value` is empty or whitespace.
pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    message: &'static str,
) -> Result<(), CheckError> {
    if value.trim().is_empty() {
        return Err(CheckError::new(field, message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_rejects_blank() {
        assert!(require_text("name", "", "Invalid name").is_err());
        assert!(require_text("name", "  ", "Invalid name").is_err());
        assert!(require_text("name", "Bill", "Invalid name").is_ok());
    }

    #[test]
    fn check_error_displays_message_only() {
        let err = CheckError::new("first_name", "Invalid customer first name");
        assert_eq!(err.to_string(), "Invalid customer first name");
        assert_eq!(err.field, "first_name");
    }
}
