//! Structural validation of request payloads and identifiers.

use std::fmt;

use serde::Serialize;

/// Longest value accepted for any descriptive text field.
pub const MAX_FIELD_LEN: usize = 255;

/// A single invalid field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every invalid field found in one payload, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError { field: field.to_string(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// `Ok(())` when nothing was pushed, otherwise the sorted errors.
    pub fn into_result(mut self) -> Result<(), FieldErrors> {
        if self.0.is_empty() {
            return Ok(());
        }
        self.0.sort_by(|a, b| a.field.cmp(&b.field));
        Err(self)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Types that can check their own fields.
pub trait Validate {
    fn validate(&self, errors: &mut FieldErrors);
}

/// Runs `val`'s checks and collects every failure.
pub fn check<T: Validate>(val: &T) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    val.validate(&mut errors);
    errors.into_result()
}

/// A field that must be present and non-blank.
pub fn required_text(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("{} is a required field", field));
    } else {
        max_len(errors, field, value);
    }
}

/// A field that may be absent; when present it is length-checked.
pub fn optional_text(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        max_len(errors, field, v);
    }
}

fn max_len(errors: &mut FieldErrors, field: &str, value: &str) {
    let len = value.trim().chars().count();
    if len > MAX_FIELD_LEN {
        errors.push(field, format!("{} must be at most {} characters in length", field, MAX_FIELD_LEN));
    }
}

/// Why an identifier was rejected. Callers only see a single "invalid id"
/// condition; the reason is kept for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("{0} is not a valid number")]
    NotANumber(String),
    #[error("value cannot be zero")]
    Zero,
    #[error("value cannot be negative")]
    Negative,
    #[error("value cannot be greater than {max}", max = u32::MAX)]
    TooLarge,
}

/// Validates that `id` is a positive integer no larger than `u32::MAX`.
pub fn check_id(id: &str) -> Result<i64, IdError> {
    let value: i64 = id.parse().map_err(|_| IdError::NotANumber(id.to_string()))?;
    if value == 0 {
        return Err(IdError::Zero);
    }
    if value < 0 {
        return Err(IdError::Negative);
    }
    if value > i64::from(u32::MAX) {
        return Err(IdError::TooLarge);
    }
    Ok(value)
}
