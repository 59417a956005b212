//! Copies allowed payload fields onto entities
//!
//! The copier is the only place where payload values reach an entity. It
//! filters keys through the resolved allow-list, coerces every allowed value
//! with the configured [`CoercionStrategy`], has the target check each one,
//! and only then writes them. A rejected value therefore leaves the target
//! untouched.

use super::registry::MappingRegistry;
use crate::core::allow_list::{FieldAllowList, FilteredPayload};
use crate::core::entity::MappableEntity;
use crate::core::error::{CopyError, MapperError, MapperResult};
use crate::core::field::{CoercionStrategy, DefaultCoercion, FieldValue, json_type};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Outcome of a successful copy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    /// Properties written on the target, in allow-list order
    pub assigned: Vec<String>,
    /// Payload keys ignored because they are not allowed
    pub dropped: Vec<String>,
}

/// Applies payloads to entities
#[derive(Clone)]
pub struct Copier {
    coercion: Arc<dyn CoercionStrategy>,
}

impl Default for Copier {
    fn default() -> Self {
        Self::new(DefaultCoercion::default())
    }
}

impl std::fmt::Debug for Copier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Copier").finish_non_exhaustive()
    }
}

impl Copier {
    /// Create a copier with a specific coercion strategy
    pub fn new(coercion: impl CoercionStrategy + 'static) -> Self {
        Self {
            coercion: Arc::new(coercion),
        }
    }

    /// Resolve `kind` in the registry and copy `payload` onto `target`
    pub fn apply<E>(
        &self,
        registry: &MappingRegistry,
        kind: &str,
        payload: Map<String, Value>,
        target: &mut E,
    ) -> MapperResult<CopyReport>
    where
        E: MappableEntity + ?Sized,
    {
        ensure_same_kind(kind, target)?;

        let allow_list = registry.resolve(kind)?;
        self.copy(&allow_list, payload, target)
    }

    /// Same as [`Copier::apply`] for a payload that has not been checked to be an object
    pub fn apply_value<E>(
        &self,
        registry: &MappingRegistry,
        kind: &str,
        payload: Value,
        target: &mut E,
    ) -> MapperResult<CopyReport>
    where
        E: MappableEntity + ?Sized,
    {
        match payload {
            Value::Object(map) => self.apply(registry, kind, map, target),
            other => Err(CopyError::InvalidPayload {
                message: format!("expected a JSON object, got {}", json_type(&other)),
            }
            .into()),
        }
    }

    /// Filter `payload` through `allow_list` and copy what remains
    pub fn copy<E>(
        &self,
        allow_list: &FieldAllowList,
        payload: Map<String, Value>,
        target: &mut E,
    ) -> MapperResult<CopyReport>
    where
        E: MappableEntity + ?Sized,
    {
        self.assign(allow_list.filter(payload), target)
    }

    /// Copy an already filtered payload
    ///
    /// The payload must have been filtered with the allow-list of the
    /// target's own kind.
    pub fn assign<E>(&self, filtered: FilteredPayload, target: &mut E) -> MapperResult<CopyReport>
    where
        E: MappableEntity + ?Sized,
    {
        ensure_same_kind(filtered.kind().as_str(), target)?;

        let mut coerced: Vec<(String, FieldValue)> = Vec::with_capacity(filtered.allowed.len());
        for (name, raw) in filtered.allowed {
            let kind = target
                .field_kind(&name)
                .ok_or_else(|| CopyError::UnknownProperty {
                    kind: target.resource_kind().to_string(),
                    field: name.clone(),
                })?;
            let value = self.coercion.coerce(&name, &kind, raw)?;
            target.check_field(&name, &value)?;
            coerced.push((name, value));
        }

        let mut assigned = Vec::with_capacity(coerced.len());
        for (name, value) in coerced {
            target.set_field(&name, value)?;
            assigned.push(name);
        }

        tracing::debug!(
            kind = target.resource_kind(),
            assigned = assigned.len(),
            dropped = filtered.dropped.len(),
            "Copied payload onto entity"
        );

        Ok(CopyReport {
            assigned,
            dropped: filtered.dropped,
        })
    }
}

fn ensure_same_kind<E>(kind: &str, target: &E) -> MapperResult<()>
where
    E: MappableEntity + ?Sized,
{
    if target.resource_kind() != kind {
        return Err(MapperError::Internal(format!(
            "cannot map '{}' payload onto a '{}' entity",
            kind,
            target.resource_kind()
        )));
    }
    Ok(())
}
