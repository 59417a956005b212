//! Resource kinds and field allow-lists
//!
//! A [`FieldAllowList`] is the closed set of inbound field names that may be
//! copied from an untrusted payload onto an entity of one [`ResourceKind`].
//! Anything not listed is dropped: a new entity property is never writable by
//! clients until its name is added to the list.

use super::error::DeclarationError;
use super::identifier::is_valid_identifier;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a domain entity type subject to mapping (e.g. "Like")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceKind(String);

impl ResourceKind {
    /// Create a resource kind, rejecting empty or non-identifier names
    pub fn new(kind: impl Into<String>) -> Result<Self, DeclarationError> {
        let kind = kind.into();
        if !is_valid_identifier(&kind) {
            return Err(DeclarationError::InvalidResourceKind { kind });
        }
        Ok(Self(kind))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, duplicate-free set of property names writable for one kind
#[derive(Debug, Clone, Serialize)]
pub struct FieldAllowList {
    kind: ResourceKind,
    names: IndexSet<String>,
}

impl FieldAllowList {
    /// Declare the allow-list for `kind`
    ///
    /// Fails if `names` is empty, repeats a name, or contains a name that is
    /// not identifier-shaped (letters, digits, underscore, no leading digit).
    pub fn define<I, S>(kind: impl Into<String>, names: I) -> Result<Self, DeclarationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = ResourceKind::new(kind)?;
        let mut set = IndexSet::new();

        for name in names {
            let name = name.into();
            if !is_valid_identifier(&name) {
                return Err(DeclarationError::InvalidFieldName {
                    kind: kind.to_string(),
                    field: name,
                });
            }
            if set.contains(&name) {
                return Err(DeclarationError::DuplicateField {
                    kind: kind.to_string(),
                    field: name,
                });
            }
            set.insert(name);
        }

        if set.is_empty() {
            return Err(DeclarationError::EmptyFieldList {
                kind: kind.to_string(),
            });
        }

        Ok(Self { kind, names: set })
    }

    /// The resource kind this list belongs to
    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Declared names, in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    /// Iterate declared names in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Case-sensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a successfully defined list
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Split a payload into allowed fields and dropped keys
    ///
    /// Allowed fields come back in declaration order; dropped keys in payload
    /// iteration order. Values are never inspected.
    pub fn filter(&self, mut payload: Map<String, Value>) -> FilteredPayload {
        let mut allowed = IndexMap::new();
        for name in &self.names {
            if let Some(value) = payload.remove(name) {
                allowed.insert(name.clone(), value);
            }
        }

        let dropped: Vec<String> = payload.into_iter().map(|(key, _)| key).collect();
        for key in &dropped {
            tracing::debug!(kind = %self.kind, field = %key, "Dropping field not in allow-list");
        }

        FilteredPayload {
            kind: self.kind.clone(),
            allowed,
            dropped,
        }
    }
}

impl PartialEq for FieldAllowList {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.names.iter().eq(other.names.iter())
    }
}

impl Eq for FieldAllowList {}

/// Result of filtering a payload through an allow-list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredPayload {
    kind: ResourceKind,
    /// Fields present in the allow-list, in declaration order
    pub allowed: IndexMap<String, Value>,
    /// Keys that were ignored
    pub dropped: Vec<String>,
}

impl FilteredPayload {
    /// Kind whose allow-list produced this payload
    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Convert the allowed fields into a JSON object
    pub fn into_json(self) -> Value {
        Value::Object(self.allowed.into_iter().collect())
    }
}
