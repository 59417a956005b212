//! Module system for mapping declarations
//!
//! Each application module declares the allow-lists of the resources it
//! owns. The `RegistryBuilder` collects them at bootstrap.

use crate::config::MappingsConfig;
use anyhow::Result;

/// Trait for a module contributing mapping declarations
pub trait MappingModule: Send + Sync {
    /// Unique module name
    fn name(&self) -> &str;

    /// Module version
    fn version(&self) -> &str {
        "1.0.0"
    }

    /// Load the module's mapping declarations
    fn mappings_config(&self) -> Result<MappingsConfig>;

    /// Resource kinds declared by this module
    fn resource_kinds(&self) -> Result<Vec<String>> {
        Ok(self
            .mappings_config()?
            .resources
            .into_iter()
            .map(|r| r.kind)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SocialModule;

    impl MappingModule for SocialModule {
        fn name(&self) -> &str {
            "social"
        }

        fn mappings_config(&self) -> Result<MappingsConfig> {
            MappingsConfig::from_yaml_str(
                r#"
resources:
  - kind: Like
    fields: [title, userId]
  - kind: Comment
    fields: [body]
"#,
            )
        }
    }

    #[test]
    fn test_default_version() {
        assert_eq!(SocialModule.version(), "1.0.0");
    }

    #[test]
    fn test_resource_kinds_from_config() {
        assert_eq!(
            SocialModule.resource_kinds().unwrap(),
            vec!["Like".to_string(), "Comment".to_string()]
        );
    }
}
