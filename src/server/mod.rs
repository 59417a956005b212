//! HTTP integration for mapped payloads

pub mod extractor;

pub use extractor::{Mapped, MappedResource};
