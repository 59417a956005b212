//! Entity side of the mapping contract
//!
//! The copier never touches struct fields directly. A target entity exposes
//! its settable properties by name through [`MappableEntity`]; concrete
//! structs usually get the implementation from `impl_mappable_entity!`, and
//! schema-driven resources can use [`DynamicEntity`].

use super::allow_list::ResourceKind;
use super::error::CopyError;
use super::field::{FieldKind, FieldValue};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

/// An entity whose properties can be written by name
pub trait MappableEntity {
    /// The resource kind this entity is mapped as (e.g. "Like")
    fn resource_kind(&self) -> &str;

    /// Declared type of a settable property, `None` if there is no such property
    fn field_kind(&self, name: &str) -> Option<FieldKind>;

    /// Check that a coerced value can be stored, without writing it
    ///
    /// The copier calls this for every field before the first `set_field`,
    /// so a value rejected here leaves the entity unchanged. Implementations
    /// whose `set_field` can fail must reject the same values here.
    fn check_field(&self, name: &str, _value: &FieldValue) -> Result<(), CopyError> {
        if self.field_kind(name).is_none() {
            return Err(CopyError::UnknownProperty {
                kind: self.resource_kind().to_string(),
                field: name.to_string(),
            });
        }
        Ok(())
    }

    /// Assign an already-coerced value
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), CopyError>;
}

/// Rust types that can back a mappable property
///
/// Implement this for domain enums to get string-to-variant conversion.
pub trait FieldType: Sized {
    fn field_kind() -> FieldKind;

    fn from_field_value(value: FieldValue) -> Option<Self>;
}

impl FieldType for String {
    fn field_kind() -> FieldKind {
        FieldKind::String
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldType for i64 {
    fn field_kind() -> FieldKind {
        FieldKind::Integer
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FieldType for i32 {
    fn field_kind() -> FieldKind {
        FieldKind::Integer
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_integer().and_then(|i| i32::try_from(i).ok())
    }
}

impl FieldType for f64 {
    fn field_kind() -> FieldKind {
        FieldKind::Float
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_float()
    }
}

impl FieldType for bool {
    fn field_kind() -> FieldKind {
        FieldKind::Boolean
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FieldType for Uuid {
    fn field_kind() -> FieldKind {
        FieldKind::Uuid
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_uuid()
    }
}

impl FieldType for DateTime<Utc> {
    fn field_kind() -> FieldKind {
        FieldKind::DateTime
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_datetime()
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn field_kind() -> FieldKind {
        FieldKind::optional(T::field_kind())
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => Some(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

/// Schema-driven entity holding typed values in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicEntity {
    kind: ResourceKind,
    schema: IndexMap<String, FieldKind>,
    values: IndexMap<String, FieldValue>,
}

impl DynamicEntity {
    /// Create an entity with no values set
    pub fn new<I, S>(kind: ResourceKind, schema: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldKind)>,
        S: Into<String>,
    {
        Self {
            kind,
            schema: schema.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            values: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Current value of a property, if it has been set
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Names of the properties that have been set
    pub fn assigned(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// Set values as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl MappableEntity for DynamicEntity {
    fn resource_kind(&self) -> &str {
        self.kind.as_str()
    }

    fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.schema.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), CopyError> {
        if !self.schema.contains_key(name) {
            return Err(CopyError::UnknownProperty {
                kind: self.kind.to_string(),
                field: name.to_string(),
            });
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}
