//! Validation utilities.

use crate::{DirectoryError, FieldError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `DirectoryError` on failure.
    fn validate_request(&self) -> Result<(), DirectoryError> {
        self.validate().map_err(validation_errors_to_directory_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Converts `validator::ValidationErrors` to `DirectoryError`.
#[must_use]
pub fn validation_errors_to_directory_error(errors: ValidationErrors) -> DirectoryError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    DirectoryError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a username has no surrounding or embedded whitespace.
    pub fn valid_username(username: &str) -> Result<(), ValidationError> {
        not_blank(username)?;
        if username.chars().any(char::is_whitespace) {
            return Err(ValidationError::new("username_whitespace"));
        }
        Ok(())
    }
}
