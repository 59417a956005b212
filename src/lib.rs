//! # This-Mapper
//!
//! Allow-listed request-to-entity field mapping for REST APIs.
//!
//! ## Features
//!
//! - **Default Deny**: only fields named in a resource's allow-list are ever
//!   copied from a request payload onto an entity
//! - **Fail-Fast Bootstrap**: malformed declarations and duplicate kinds abort
//!   registration before anything is registered
//! - **Configuration-Based**: declare allow-lists in YAML, per module
//! - **Pluggable Coercion**: payload values are converted by a swappable strategy
//! - **Translatable Errors**: every error carries a stable code, a domain and
//!   ordered parameters
//! - **Axum Integration**: `Mapped<T>` extractor filters bodies before handlers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use this_mapper::prelude::*;
//!
//! #[derive(Default)]
//! struct Like {
//!     title: String,
//!     user_id: i64,
//! }
//!
//! impl_mappable_entity!(Like, "Like", {
//!     "title" => title: String,
//!     "userId" => user_id: i64,
//! });
//!
//! let registry = MappingRegistry::new();
//! registry.register(FieldAllowList::define("Like", ["title", "description", "userId"])?)?;
//!
//! let payload = serde_json::json!({ "title": "hi", "admin": true, "userId": 7 });
//! let mut like = Like::default();
//! let report = Copier::default().apply_value(&registry, "Like", payload, &mut like)?;
//!
//! assert_eq!(report.dropped, vec!["admin"]);
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod mapping;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        allow_list::{FieldAllowList, FilteredPayload, ResourceKind},
        entity::{DynamicEntity, FieldType, MappableEntity},
        field::{CoercionStrategy, DefaultCoercion, FieldKind, FieldValue},
        identifier::is_valid_identifier,
        module::MappingModule,
    };

    // === Errors ===
    pub use crate::core::error::{
        ConfigError, CopyError, DeclarationError, ErrorResponse, MapperError, MapperResult,
        RegistryError, TranslatableError,
    };

    // === Macros ===
    pub use crate::impl_mappable_entity;

    // === Mapping ===
    pub use crate::mapping::{
        Copier, CopyReport, MappingConfiguration, MappingRegistry, RegistryBuilder,
    };

    // === Config ===
    pub use crate::config::{MappingsConfig, ResourceMapping};

    // === Server ===
    pub use crate::server::{Mapped, MappedResource};

    // === External dependencies ===
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Map, Value, json};
}
