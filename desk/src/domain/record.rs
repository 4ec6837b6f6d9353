//! Records exchanged with the REST API and the form values that edit them.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Number, Value};

use crate::domain::dates;
use crate::domain::schema::{FieldKind, ResourceSchema};

/// Wire name of the server-assigned identifier.
pub const ID_KEY: &str = "_id";

/// Validation errors for [`RecordId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdValidationError {
    /// The identifier was blank.
    #[error("record id must not be empty")]
    Empty,
    /// The identifier cannot be used as a URL path segment.
    #[error("record id must not contain `/`, `?`, `#` or whitespace")]
    InvalidCharacter,
}

/// Server-assigned record identifier.
///
/// ## Invariants
/// - Non-empty.
/// - Contains no `/`, `?`, `#` or whitespace, so it is safe as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Validate and wrap an identifier.
    ///
    /// # Examples
    /// ```
    /// use hotel_desk::domain::RecordId;
    ///
    /// assert!(RecordId::new("65f1c0ffee").is_ok());
    /// assert!(RecordId::new("a/b").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, RecordIdValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RecordIdValidationError::Empty);
        }
        if raw
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(RecordIdValidationError::InvalidCharacter);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

/// One domain entity: an identifier plus flat named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    /// Build a record. Any `_id` entry in `fields` is dropped in favour of `id`.
    #[must_use]
    pub fn new(id: RecordId, mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_KEY);
        Self { id, fields }
    }

    /// Server-assigned identifier.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Raw value of one field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All fields except the identifier.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Text of one field as the API returned it, or empty when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(value_text).unwrap_or_default()
    }
}

/// Render a JSON scalar as plain text.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Errors raised while turning validated form values into an API payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// A numeric field did not hold a finite number.
    #[error("field `{field}` is not a finite number: {value:?}")]
    NotANumber {
        /// Field name.
        field: String,
        /// Submitted text.
        value: String,
    },
}

/// Submitted form contents, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// An empty form, as shown in create mode.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pre-fill a form from the canonical record.
    ///
    /// Values come from the record itself, never from formatted table text,
    /// so currency prefixes and display date formats cannot leak back into
    /// the form. Date fields are normalised to `YYYY-MM-DD`.
    #[must_use]
    pub fn from_record(schema: &ResourceSchema, record: &Record) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|field| {
                let raw = record.text(field.name);
                let value = match field.kind {
                    FieldKind::Date => dates::parse_date(&raw)
                        .map(dates::input_value)
                        .unwrap_or(raw),
                    _ => raw,
                };
                (field.name.to_owned(), value)
            })
            .collect();
        Self(values)
    }

    /// Set one value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`Self::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Raw submitted text of one field, or empty when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Build the JSON body sent to the API.
    ///
    /// Only schema fields are sent. Text is trimmed; numeric fields become
    /// JSON numbers, integral values as integers.
    ///
    /// # Errors
    /// Returns [`PayloadError::NotANumber`] when a numeric field does not
    /// parse. Validated forms never hit this.
    pub fn to_payload(&self, schema: &ResourceSchema) -> Result<Map<String, Value>, PayloadError> {
        let mut payload = Map::new();
        for field in schema.fields() {
            let raw = self.get(field.name).trim();
            let value = match field.kind {
                FieldKind::Number => number_value(raw).ok_or_else(|| PayloadError::NotANumber {
                    field: field.name.to_owned(),
                    value: raw.to_owned(),
                })?,
                _ => Value::String(raw.to_owned()),
            };
            payload.insert(field.name.to_owned(), value);
        }
        Ok(payload)
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Parse numeric form text. Rejects empty, non-finite and non-numeric input.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn number_value(raw: &str) -> Option<Value> {
    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

    let parsed = parse_number(raw)?;
    // Integral values inside the exactly-representable range go out as integers.
    if parsed.fract() == 0.0 && parsed.abs() < MAX_EXACT_INTEGER {
        return Some(Value::from(parsed as i64));
    }
    Number::from_f64(parsed).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn employee() -> Record {
        let Value::Object(fields) = json!({
            "_id": "ignored",
            "documento": "1020",
            "nombre": "Ana",
            "apellido": "Gómez, Ruiz",
            "email": "ana@example.com",
            "telefono": "3001234567",
            "cargo": "Recepción",
            "salario": 2500000,
            "fecha_entrada": "2024-02-01T00:00:00.000Z"
        }) else {
            panic!("fixture is an object");
        };
        Record::new(RecordId::new("65f0a1").expect("valid id"), fields)
    }

    #[rstest]
    #[case::empty("", RecordIdValidationError::Empty)]
    #[case::slash("a/b", RecordIdValidationError::InvalidCharacter)]
    #[case::space("a b", RecordIdValidationError::InvalidCharacter)]
    #[case::query("a?b", RecordIdValidationError::InvalidCharacter)]
    fn rejects_unsafe_ids(#[case] raw: &str, #[case] expected: RecordIdValidationError) {
        assert_eq!(RecordId::new(raw), Err(expected));
    }

    #[test]
    fn record_drops_embedded_identifier() {
        let record = employee();
        assert_eq!(record.id().as_str(), "65f0a1");
        assert!(record.get(ID_KEY).is_none());
    }

    #[test]
    fn prefill_reads_canonical_values() {
        let schema = ResourceSchema::employees().expect("valid schema");
        let form = FormValues::from_record(&schema, &employee());
        assert_eq!(form.get("salario"), "2500000");
        assert_eq!(form.get("fecha_entrada"), "2024-02-01");
        assert_eq!(form.get("apellido"), "Gómez, Ruiz");
    }

    #[test]
    fn payload_converts_numbers_and_trims_text() {
        let schema = ResourceSchema::inventory().expect("valid schema");
        let form = FormValues::empty()
            .with("codigoarticulo", " A-1 ")
            .with("articulo", "Toalla")
            .with("categoria", "Lencería")
            .with("existencias", "12")
            .with("precio", "15.5")
            .with("unrelated", "dropped");
        let payload = form.to_payload(&schema).expect("payload builds");
        assert_eq!(
            Value::Object(payload),
            json!({
                "codigoarticulo": "A-1",
                "articulo": "Toalla",
                "categoria": "Lencería",
                "existencias": 12,
                "precio": 15.5
            })
        );
    }

    #[test]
    fn payload_rejects_non_numeric_text() {
        let schema = ResourceSchema::inventory().expect("valid schema");
        let form = FormValues::empty().with("existencias", "doce").with("precio", "1");
        let err = form.to_payload(&schema).expect_err("not a number");
        assert!(matches!(err, PayloadError::NotANumber { ref field, .. } if field == "existencias"));
    }

    #[rstest]
    #[case("1500", Some(1500.0))]
    #[case(" 2.5 ", Some(2.5))]
    #[case("1e3", Some(1000.0))]
    #[case("NaN", None)]
    #[case("inf", None)]
    #[case("", None)]
    #[case("doce", None)]
    fn parses_numbers(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_number(raw), expected);
    }
}
