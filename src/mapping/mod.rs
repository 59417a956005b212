//! Mapping configurations, their registry and the payload copier

pub mod configuration;
pub mod copier;
pub mod registry;

pub use configuration::MappingConfiguration;
pub use copier::{Copier, CopyReport};
pub use registry::{MappingRegistry, RegistryBuilder};
