//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on:
//! - Printed collection lists (names, phone numbers, national ids)
//! - Reasonable UX limits for names, notes, addresses
//! - SQLite TEXT has no built-in length enforcement

use validator::Validate;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person / product names
pub const MAX_NAME_LEN: usize = 200;

/// Payment notes
pub const MAX_NOTE_LEN: usize = 255;

/// Short identifiers: phone, national id, relationship
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Run `validator` rules on a request payload, reporting one message per field.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|errors| {
        AppError::field_errors(errors.field_errors().into_iter().map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{field} is invalid"));
            (field.to_string(), message)
        }))
    })
}

// ── Field error collection (form parsing) ───────────────────────────

/// Collects field-level errors so a form reports every problem at once.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push((field.into(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Required text: trimmed, non-empty, within `max_len` characters
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        max_len: usize,
    ) -> Option<String> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => {
                self.add(field, format!("{field} is required"));
                None
            }
            Some(v) => self.check_len(field, v, max_len),
        }
    }

    /// Optional text: blank becomes `None`
    pub fn optional_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        max_len: usize,
    ) -> Option<String> {
        let v = value.map(str::trim).filter(|v| !v.is_empty())?;
        self.check_len(field, v, max_len)
    }

    /// Required finite number
    pub fn required_number(&mut self, field: &str, value: Option<&str>) -> Option<f64> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => {
                self.add(field, format!("{field} is required"));
                None
            }
            Some(v) => self.parse_number(field, v),
        }
    }

    /// Optional finite number: blank becomes `None`
    pub fn optional_number(&mut self, field: &str, value: Option<&str>) -> Option<f64> {
        let v = value.map(str::trim).filter(|v| !v.is_empty())?;
        self.parse_number(field, v)
    }

    /// Required integer
    pub fn required_integer(&mut self, field: &str, value: Option<&str>) -> Option<i64> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => {
                self.add(field, format!("{field} is required"));
                None
            }
            Some(v) => match v.parse::<i64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    self.add(field, format!("{field} must be an integer"));
                    None
                }
            },
        }
    }

    /// `Ok(())` when nothing was collected, otherwise one `ValidationFailed`
    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::field_errors(self.errors))
        }
    }

    fn check_len(&mut self, field: &str, value: &str, max_len: usize) -> Option<String> {
        let len = value.chars().count();
        if len > max_len {
            self.add(
                field,
                format!("{field} is too long ({len} chars, max {max_len})"),
            );
            return None;
        }
        Some(value.to_string())
    }

    fn parse_number(&mut self, field: &str, value: &str) -> Option<f64> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                self.add(field, format!("{field} must be a number"));
                None
            }
        }
    }
}
