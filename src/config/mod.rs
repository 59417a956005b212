//! Configuration loading and management
//!
//! Allow-lists are usually authored as YAML, one entry per resource:
//!
//! ```yaml
//! resources:
//!   - kind: Like
//!     fields: [title, description, userId]
//!     metadata:
//!       module: social
//! ```

use crate::core::allow_list::FieldAllowList;
use crate::core::error::{ConfigError, DeclarationError, MapperError};
use crate::mapping::{MappingConfiguration, MappingRegistry};
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Declaration of one resource's allow-list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMapping {
    /// Resource kind (e.g., "Like")
    pub kind: String,

    /// Writable field names, in mapping order
    pub fields: Vec<String>,

    /// Optional free-form metadata
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, String>,
}

impl ResourceMapping {
    /// Validate the declaration and build its configuration
    pub fn to_configuration(&self) -> Result<MappingConfiguration, DeclarationError> {
        let allow_list = FieldAllowList::define(self.kind.clone(), self.fields.iter().cloned())?;
        Ok(self
            .metadata
            .iter()
            .fold(MappingConfiguration::new(allow_list), |config, (k, v)| {
                config.with_metadata(k.clone(), v.clone())
            }))
    }
}

/// Complete configuration for the mapping system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingsConfig {
    /// List of resource declarations
    #[serde(default)]
    pub resources: Vec<ResourceMapping>,
}

impl MappingsConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MapperError::Config(ConfigError::FileNotFound {
                    path: path.to_string(),
                })
            } else {
                MapperError::from(e)
            }
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            MapperError::Config(ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            })
        })?;

        tracing::info!(
            path = %path,
            resources = config.resources.len(),
            "Loaded mapping configuration"
        );
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(MapperError::from)?;
        Ok(config)
    }

    /// Find the declaration for a resource kind
    pub fn find(&self, kind: &str) -> Option<&ResourceMapping> {
        self.resources.iter().find(|r| r.kind == kind)
    }

    /// Merge several configs into one
    ///
    /// A kind declared in more than one config keeps the position of its first
    /// appearance and the content of its last one.
    pub fn merge(configs: Vec<Self>) -> Self {
        let mut merged: IndexMap<String, ResourceMapping> = IndexMap::new();

        for config in configs {
            for resource in config.resources {
                merged.insert(resource.kind.clone(), resource);
            }
        }

        Self {
            resources: merged.into_values().collect(),
        }
    }

    /// Validate every declaration
    ///
    /// Stops at the first invalid declaration.
    pub fn to_configurations(&self) -> Result<Vec<MappingConfiguration>, DeclarationError> {
        self.resources
            .iter()
            .map(ResourceMapping::to_configuration)
            .collect()
    }

    /// Validate every declaration, then register them all into `registry`
    ///
    /// Nothing is registered unless every declaration is valid and no kind is
    /// already present.
    pub fn register_into(
        &self,
        registry: &MappingRegistry,
    ) -> Result<Vec<Arc<MappingConfiguration>>, MapperError> {
        let configurations = self.to_configurations()?;
        registry.register_all(configurations)
    }

    /// Default configuration with the profile `Like` resource
    pub fn default_config() -> Self {
        Self {
            resources: vec![ResourceMapping {
                kind: "Like".to_string(),
                fields: [
                    "title",
                    "description",
                    "userId",
                    "photo",
                    "birthday",
                    "gender",
                    "googleId",
                    "githubId",
                    "githubUrl",
                    "instagramUrl",
                    "linkedInId",
                    "linkedInUrl",
                    "twitterUrl",
                    "facebookUrl",
                    "phone",
                ]
                .into_iter()
                .map(str::to_string)
                .collect(),
                metadata: IndexMap::new(),
            }],
        }
    }
}
