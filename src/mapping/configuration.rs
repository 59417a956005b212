//! Binding of a resource kind to its field allow-list

use crate::core::allow_list::{FieldAllowList, ResourceKind};
use indexmap::IndexMap;
use std::sync::Arc;

/// A resource kind paired with its allow-list and optional metadata
///
/// The kind is taken from the allow-list itself, so a configuration can never
/// point at a list declared for another kind. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConfiguration {
    allow_list: Arc<FieldAllowList>,
    metadata: IndexMap<String, String>,
}

impl MappingConfiguration {
    pub fn new(allow_list: FieldAllowList) -> Self {
        Self {
            allow_list: Arc::new(allow_list),
            metadata: IndexMap::new(),
        }
    }

    /// Attach a metadata entry (e.g. a description or owning module)
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> &ResourceKind {
        self.allow_list.kind()
    }

    /// Shared handle to the allow-list
    pub fn allow_list(&self) -> &Arc<FieldAllowList> {
        &self.allow_list
    }

    pub fn metadata(&self) -> &IndexMap<String, String> {
        &self.metadata
    }
}
