//! Form validation run before any API call.

use crate::domain::dates;
use crate::domain::record::{FormValues, parse_number};
use crate::domain::schema::{FieldKind, ResourceSchema};

/// Alert shown when a required field is empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Por favor, completa todos los campos.";
/// Alert shown when a date field does not hold a calendar date.
pub const INVALID_DATE_MESSAGE: &str = "La fecha no es válida.";

/// Reasons a form is rejected. `Display` yields the alert text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is empty after trimming.
    #[error("Por favor, completa todos los campos.")]
    MissingField {
        /// First empty field, in column order.
        field: &'static str,
    },
    /// A numeric field is not a number.
    #[error("El campo {label} debe ser numérico.")]
    NotANumber {
        /// Field name.
        field: &'static str,
        /// Field label.
        label: &'static str,
    },
    /// A designated numeric field is non-numeric or not above zero.
    #[error("{message}")]
    NotPositive {
        /// Field name.
        field: &'static str,
        /// Schema-provided alert.
        message: &'static str,
    },
    /// A date field does not parse.
    #[error("La fecha no es válida.")]
    InvalidDate {
        /// Field name.
        field: &'static str,
    },
    /// The start date is not strictly before the end date.
    #[error("{message}")]
    DateOrder {
        /// Schema-provided alert.
        message: &'static str,
    },
}

impl ValidationError {
    /// Field the error points at, when there is exactly one.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field }
            | Self::NotANumber { field, .. }
            | Self::NotPositive { field, .. }
            | Self::InvalidDate { field } => Some(*field),
            Self::DateOrder { .. } => None,
        }
    }
}

/// Check a submitted form against its schema.
///
/// Rules are applied in order: every required field must be non-empty, then
/// numeric fields must parse (designated ones must be above zero), then date
/// fields must parse, then the schema's date range must be strictly ordered.
///
/// # Errors
/// Returns the first [`ValidationError`] found.
///
/// # Examples
/// ```
/// use hotel_desk::domain::{FormValues, ResourceSchema, validate};
///
/// let schema = ResourceSchema::employees().expect("builtin schema");
/// let form = FormValues::empty().with("documento", "").with("nombre", "Ana");
/// assert!(validate(&schema, &form).is_err());
/// ```
pub fn validate(schema: &ResourceSchema, form: &FormValues) -> Result<(), ValidationError> {
    if let Some(field) = schema
        .fields()
        .iter()
        .find(|field| field.required && form.get(field.name).trim().is_empty())
    {
        return Err(ValidationError::MissingField { field: field.name });
    }

    for field in schema.fields().iter().filter(|f| f.kind == FieldKind::Number) {
        let raw = form.get(field.name);
        if raw.trim().is_empty() {
            continue;
        }
        let number = parse_number(raw);
        match (number, field.positive) {
            (Some(value), Some(message)) if value <= 0.0 => {
                return Err(ValidationError::NotPositive {
                    field: field.name,
                    message,
                });
            }
            (None, Some(message)) => {
                return Err(ValidationError::NotPositive {
                    field: field.name,
                    message,
                });
            }
            (None, None) => {
                return Err(ValidationError::NotANumber {
                    field: field.name,
                    label: field.label,
                });
            }
            _ => {}
        }
    }

    for field in schema.fields().iter().filter(|f| f.kind == FieldKind::Date) {
        let raw = form.get(field.name);
        if !raw.trim().is_empty() && dates::parse_date(raw).is_none() {
            return Err(ValidationError::InvalidDate { field: field.name });
        }
    }

    if let Some(range) = schema.date_range() {
        let start = dates::parse_date(form.get(range.start));
        let end = dates::parse_date(form.get(range.end));
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(ValidationError::DateOrder {
                    message: range.message,
                });
            }
        }
    }

    Ok(())
}
