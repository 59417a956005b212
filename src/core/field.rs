//! Field value types and payload coercion

use super::error::CopyError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(d) => Some(*d),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert back to a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Uuid(u) => Value::String(u.to_string()),
            FieldValue::DateTime(d) => Value::String(d.to_rfc3339()),
            FieldValue::Null => Value::Null,
        }
    }
}

/// Declared type of an entity property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Uuid,
    DateTime,
    /// String restricted to a fixed set of variants
    Enum(Vec<String>),
    /// Inner kind, or null
    Optional(Box<FieldKind>),
}

impl FieldKind {
    /// Shorthand for an optional property
    pub fn optional(inner: FieldKind) -> Self {
        FieldKind::Optional(Box::new(inner))
    }

    /// Shorthand for an enum property
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum(variants.into_iter().map(Into::into).collect())
    }

    /// Human-readable name used in coercion errors
    pub fn describe(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Float => "float".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Uuid => "uuid".to_string(),
            FieldKind::DateTime => "datetime".to_string(),
            FieldKind::Enum(variants) => format!("one of [{}]", variants.join(", ")),
            FieldKind::Optional(inner) => format!("optional {}", inner.describe()),
        }
    }
}

/// Strategy converting raw payload values to typed property values
///
/// The copier calls this once per allowed field. Implementations decide how
/// lenient conversions are; a failure is reported as [`CopyError::Coercion`].
pub trait CoercionStrategy: Send + Sync {
    fn coerce(&self, field: &str, kind: &FieldKind, value: Value) -> Result<FieldValue, CopyError>;
}

/// Default JSON coercion
///
/// Lenient mode also parses numbers and booleans sent as strings, which is
/// what form-encoded clients produce. Strict mode only accepts native JSON
/// types for them.
#[derive(Debug, Clone, Copy)]
pub struct DefaultCoercion {
    parse_strings: bool,
}

impl Default for DefaultCoercion {
    fn default() -> Self {
        Self {
            parse_strings: true,
        }
    }
}

impl DefaultCoercion {
    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            parse_strings: false,
        }
    }

    fn mismatch(field: &str, kind: &FieldKind, value: &Value) -> CopyError {
        CopyError::coercion(field, kind.describe(), format!("got {}", json_type(value)))
    }
}

impl CoercionStrategy for DefaultCoercion {
    fn coerce(&self, field: &str, kind: &FieldKind, value: Value) -> Result<FieldValue, CopyError> {
        match (kind, value) {
            (FieldKind::Optional(_), Value::Null) => Ok(FieldValue::Null),
            (FieldKind::Optional(inner), value) => self.coerce(field, inner, value),
            (_, Value::Null) => Err(CopyError::coercion(
                field,
                kind.describe(),
                "null is not allowed",
            )),

            (FieldKind::String, Value::String(s)) => Ok(FieldValue::String(s)),

            (FieldKind::Integer, Value::Number(n)) => n
                .as_i64()
                .map(FieldValue::Integer)
                .ok_or_else(|| CopyError::coercion(field, "integer", format!("{} is not an integer", n))),
            (FieldKind::Integer, Value::String(s)) if self.parse_strings => s
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| CopyError::coercion(field, "integer", e.to_string())),

            (FieldKind::Float, Value::Number(n)) => n
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| CopyError::coercion(field, "float", format!("{} is out of range", n))),
            (FieldKind::Float, Value::String(s)) if self.parse_strings => {
                let parsed = s
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| CopyError::coercion(field, "float", e.to_string()))?;
                if !parsed.is_finite() {
                    return Err(CopyError::coercion(
                        field,
                        "float",
                        format!("'{}' is not a finite number", s),
                    ));
                }
                Ok(FieldValue::Float(parsed))
            }

            (FieldKind::Boolean, Value::Bool(b)) => Ok(FieldValue::Boolean(b)),
            (FieldKind::Boolean, Value::String(s)) if self.parse_strings => {
                match s.as_str() {
                    "true" | "1" => Ok(FieldValue::Boolean(true)),
                    "false" | "0" => Ok(FieldValue::Boolean(false)),
                    other => Err(CopyError::coercion(
                        field,
                        "boolean",
                        format!("'{}' is not a boolean", other),
                    )),
                }
            }

            (FieldKind::Uuid, Value::String(s)) => Uuid::parse_str(&s)
                .map(FieldValue::Uuid)
                .map_err(|e| CopyError::coercion(field, "uuid", e.to_string())),

            (FieldKind::DateTime, Value::String(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|d| FieldValue::DateTime(d.with_timezone(&Utc)))
                .map_err(|e| CopyError::coercion(field, "datetime", e.to_string())),

            (FieldKind::Enum(variants), Value::String(s)) => {
                if variants.iter().any(|v| v == &s) {
                    Ok(FieldValue::String(s))
                } else {
                    Err(CopyError::coercion(
                        field,
                        kind.describe(),
                        format!("'{}' is not a known variant", s),
                    ))
                }
            }

            (kind, value) => Err(Self::mismatch(field, kind, &value)),
        }
    }
}

/// JSON type name used in coercion and payload errors
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
