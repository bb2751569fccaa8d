// ABOUTME: Field validation rules applied before anything reaches storage
// ABOUTME: Length bounds, required values, and slug/filename shape checks

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("invalid slug '{0}': use lowercase letters, digits and single hyphens")]
    InvalidSlug(String),
    #[error("cannot derive a slug from '{0}'")]
    EmptySlug(String),
    #[error("invalid filename '{0}'")]
    InvalidFilename(String),
    #[error("unknown {field} '{id}'")]
    UnknownReference { field: &'static str, id: String },
}

/// Fail when `value` is longer than `max` characters (not bytes)
pub fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Fail when `value` is empty or whitespace only
pub fn check_not_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
