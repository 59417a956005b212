//! Core module containing the allow-list, field and error types

pub mod allow_list;
pub mod entity;
pub mod error;
pub mod field;
pub mod identifier;
pub mod module;

pub use allow_list::{FieldAllowList, FilteredPayload, ResourceKind};
pub use entity::{DynamicEntity, FieldType, MappableEntity};
pub use error::{
    ConfigError, CopyError, DeclarationError, MapperError, MapperResult, RegistryError,
    TranslatableError,
};
pub use field::{CoercionStrategy, DefaultCoercion, FieldKind, FieldValue};
pub use identifier::is_valid_identifier;
pub use module::MappingModule;
