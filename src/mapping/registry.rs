//! Registry of mapping configurations, keyed by resource kind
//!
//! Registration happens at bootstrap; afterwards the registry is only read.
//! Entries live in an immutable snapshot that writers replace as a whole, so
//! a concurrent `resolve` never sees a half-written entry.

use super::configuration::MappingConfiguration;
use crate::config::MappingsConfig;
use crate::core::allow_list::FieldAllowList;
use crate::core::error::{MapperResult, RegistryError};
use crate::core::module::MappingModule;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

type Snapshot = HashMap<String, Arc<MappingConfiguration>>;

/// Lookup table from resource kind to mapping configuration
#[derive(Debug, Default)]
pub struct MappingRegistry {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl MappingRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    ///
    /// Prefer an injected `Arc<MappingRegistry>`; this exists for hosts that
    /// register from scattered bootstrap code.
    pub fn global() -> &'static MappingRegistry {
        static GLOBAL: OnceLock<MappingRegistry> = OnceLock::new();
        GLOBAL.get_or_init(MappingRegistry::new)
    }

    fn current(&self) -> Arc<Snapshot> {
        // Entries are immutable, so a poisoned lock still holds a usable snapshot
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register the allow-list for its resource kind
    pub fn register(&self, allow_list: FieldAllowList) -> MapperResult<Arc<MappingConfiguration>> {
        self.register_configuration(MappingConfiguration::new(allow_list))
    }

    /// Register a fully built configuration
    pub fn register_configuration(
        &self,
        config: MappingConfiguration,
    ) -> MapperResult<Arc<MappingConfiguration>> {
        let mut registered = self.register_all(vec![config])?;
        Ok(registered.remove(0))
    }

    /// Register several configurations at once
    ///
    /// Either every configuration is registered or none is: a duplicate,
    /// against existing entries or within the batch, leaves the registry
    /// untouched.
    pub fn register_all(
        &self,
        configs: Vec<MappingConfiguration>,
    ) -> MapperResult<Vec<Arc<MappingConfiguration>>> {
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        {
            let mut seen = HashSet::new();
            for config in &configs {
                let kind = config.kind().as_str();
                if guard.contains_key(kind) || !seen.insert(kind) {
                    tracing::warn!(kind = %kind, "Rejected duplicate mapping registration");
                    return Err(RegistryError::DuplicateRegistration {
                        kind: kind.to_string(),
                    }
                    .into());
                }
            }
        }

        let mut next: Snapshot = (**guard).clone();
        let mut registered = Vec::with_capacity(configs.len());
        for config in configs {
            let config = Arc::new(config);
            tracing::info!(
                kind = %config.kind(),
                fields = config.allow_list().len(),
                "Registered mapping configuration"
            );
            next.insert(config.kind().to_string(), Arc::clone(&config));
            registered.push(config);
        }

        *guard = Arc::new(next);
        Ok(registered)
    }

    /// Resolve the allow-list registered for `kind`
    pub fn resolve(&self, kind: &str) -> MapperResult<Arc<FieldAllowList>> {
        self.configuration(kind)
            .map(|config| Arc::clone(config.allow_list()))
    }

    /// Resolve the whole configuration registered for `kind`
    pub fn configuration(&self, kind: &str) -> MapperResult<Arc<MappingConfiguration>> {
        self.current().get(kind).cloned().ok_or_else(|| {
            tracing::warn!(kind = %kind, "No mapping registered for resource kind");
            RegistryError::UnknownResourceKind {
                kind: kind.to_string(),
            }
            .into()
        })
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.current().contains_key(kind)
    }

    /// All registered kinds, sorted
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.current().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Fail with the first kind that has no mapping
    ///
    /// Run at startup for every kind the application serves, so a missing
    /// declaration stops the boot instead of failing requests later.
    pub fn ensure_registered<'a, I>(&self, kinds: I) -> MapperResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let snapshot = self.current();
        for kind in kinds {
            if !snapshot.contains_key(kind) {
                return Err(RegistryError::UnknownResourceKind {
                    kind: kind.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Drop every registration (test harnesses only)
    pub fn reset(&self) {
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(HashMap::new());
        tracing::debug!("Mapping registry reset");
    }
}

/// Collects mapping declarations from configs and modules, then registers
/// them in one step
///
/// # Example
///
/// ```ignore
/// let registry = RegistryBuilder::new()
///     .with_config(MappingsConfig::default_config())
///     .register_module(SocialModule)?
///     .build()?;
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    configs: Vec<MappingsConfig>,
    modules: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping config
    pub fn with_config(mut self, config: MappingsConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Load a module's declarations
    pub fn register_module(mut self, module: impl MappingModule) -> anyhow::Result<Self> {
        let config = module.mappings_config()?;
        tracing::debug!(
            module = module.name(),
            version = module.version(),
            resources = config.resources.len(),
            "Loaded module mappings"
        );
        self.configs.push(config);
        self.modules.push(module.name().to_string());
        Ok(self)
    }

    /// Names of the modules loaded so far
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Validate every declaration, then register them into a new registry
    pub fn build(self) -> MapperResult<MappingRegistry> {
        let registry = MappingRegistry::new();
        self.build_into(&registry)?;
        Ok(registry)
    }

    /// Validate every declaration, then register them into `registry`
    ///
    /// A kind declared by two configs is a duplicate registration.
    pub fn build_into(self, registry: &MappingRegistry) -> MapperResult<()> {
        let mut configurations = Vec::new();
        for config in &self.configs {
            configurations.extend(config.to_configurations()?);
        }
        registry.register_all(configurations)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{DeclarationError, MapperError};

    fn like() -> FieldAllowList {
        FieldAllowList::define("Like", ["title", "description", "userId"]).unwrap()
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = MappingRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.kinds().is_empty());
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = MappingRegistry::new();
        let config = registry.register(like()).unwrap();

        let resolved = registry.resolve("Like").unwrap();
        assert_eq!(resolved.as_ref(), &like());
        assert!(Arc::ptr_eq(&resolved, config.allow_list()));
        assert!(registry.is_registered("Like"));
    }

    #[test]
    fn test_resolve_unknown_kind() {
        let registry = MappingRegistry::new();
        let err = registry.resolve("Comment").unwrap_err();
        assert!(matches!(
            err,
            MapperError::Registry(RegistryError::UnknownResourceKind { ref kind }) if kind == "Comment"
        ));
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let registry = MappingRegistry::new();
        registry.register(like()).unwrap();

        let other = FieldAllowList::define("Like", ["admin"]).unwrap();
        let err = registry.register(other).unwrap_err();
        assert!(matches!(
            err,
            MapperError::Registry(RegistryError::DuplicateRegistration { .. })
        ));
        assert_eq!(registry.resolve("Like").unwrap().as_ref(), &like());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_all_is_atomic() {
        let registry = MappingRegistry::new();
        let batch = vec![
            MappingConfiguration::new(like()),
            MappingConfiguration::new(FieldAllowList::define("Comment", ["body"]).unwrap()),
            MappingConfiguration::new(FieldAllowList::define("Like", ["title"]).unwrap()),
        ];

        assert!(registry.register_all(batch).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_kinds_sorted() {
        let registry = MappingRegistry::new();
        registry
            .register(FieldAllowList::define("Photo", ["url"]).unwrap())
            .unwrap();
        registry.register(like()).unwrap();
        registry
            .register(FieldAllowList::define("Comment", ["body"]).unwrap())
            .unwrap();
        assert_eq!(registry.kinds(), vec!["Comment", "Like", "Photo"]);
    }

    #[test]
    fn test_reset_returns_to_unregistered() {
        let registry = MappingRegistry::new();
        registry.register(like()).unwrap();
        registry.reset();
        assert!(registry.resolve("Like").is_err());
        registry.register(like()).unwrap();
        assert!(registry.is_registered("Like"));
    }

    #[test]
    fn test_ensure_registered() {
        let registry = MappingRegistry::new();
        registry.register(like()).unwrap();
        assert!(registry.ensure_registered(["Like"]).is_ok());
        let err = registry.ensure_registered(["Like", "Comment"]).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_RESOURCE_KIND");
    }

    #[test]
    fn test_configuration_keeps_metadata() {
        let registry = MappingRegistry::new();
        registry
            .register_configuration(MappingConfiguration::new(like()).with_metadata("module", "social"))
            .unwrap();
        let config = registry.configuration("Like").unwrap();
        assert_eq!(config.metadata().get("module").map(String::as_str), Some("social"));
    }

    #[test]
    fn test_resolved_list_outlives_reset() {
        let registry = MappingRegistry::new();
        registry.register(like()).unwrap();
        let held = registry.resolve("Like").unwrap();
        registry.reset();
        assert!(held.contains("title"));
    }

    #[test]
    fn test_builder_registers_configs() {
        let registry = RegistryBuilder::new()
            .with_config(MappingsConfig::default_config())
            .build()
            .unwrap();
        assert!(registry.resolve("Like").unwrap().contains("linkedInUrl"));
    }

    #[test]
    fn test_builder_rejects_invalid_declaration_without_partial_state() {
        let config = MappingsConfig::from_yaml_str(
            r#"
resources:
  - kind: Like
    fields: [title]
  - kind: Comment
    fields: [body, body]
"#,
        )
        .unwrap();

        let registry = MappingRegistry::new();
        let err = RegistryBuilder::new()
            .with_config(config)
            .build_into(&registry)
            .unwrap_err();
        assert!(matches!(
            err,
            MapperError::Declaration(DeclarationError::DuplicateField { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_builder_rejects_kind_declared_twice() {
        let err = RegistryBuilder::new()
            .with_config(MappingsConfig::default_config())
            .with_config(MappingsConfig::default_config())
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_REGISTRATION");
    }

    #[test]
    fn test_concurrent_resolve_during_registration() {
        let registry = Arc::new(MappingRegistry::new());
        registry.register(like()).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let list = registry.resolve("Like").unwrap();
                        assert_eq!(list.len(), 3);
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let list = FieldAllowList::define(format!("Kind{}", i), ["name"]).unwrap();
            registry.register(list).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(registry.len(), 51);
    }
}
