//! Typed error handling for the mapper
//!
//! Every failure raised by the mapping core is a [`MapperError`]. Errors are
//! grouped by category so callers can match on what went wrong:
//!
//! - [`DeclarationError`]: a field allow-list was declared with bad names
//! - [`RegistryError`]: duplicate registration or unknown resource kind
//! - [`CopyError`]: the copier could not write an allowed field onto an entity
//! - [`ConfigError`]: mapping configuration could not be loaded
//!
//! Each error also exposes a stable code, an optional message domain and an
//! ordered parameter list through [`MapperError::translatable`], so a hosting
//! application can localize messages without the core knowing about it.
//!
//! # Example
//!
//! ```rust,ignore
//! use this_mapper::prelude::*;
//!
//! match registry.resolve("Comment") {
//!     Ok(allow_list) => println!("{:?}", allow_list.names()),
//!     Err(MapperError::Registry(RegistryError::UnknownResourceKind { kind })) => {
//!         eprintln!("no mapping declared for {}", kind);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Message domain used for every error raised by the mapping core
pub const MAPPING_DOMAIN: &str = "mapping";

/// Message domain used for configuration loading errors
pub const CONFIG_DOMAIN: &str = "config";

/// The main error type for the mapper
#[derive(Debug)]
pub enum MapperError {
    /// A field allow-list declaration was rejected
    Declaration(DeclarationError),

    /// Registration or lookup in the mapping registry failed
    Registry(RegistryError),

    /// Copying an allowed field onto an entity failed
    Copy(CopyError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for MapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperError::Declaration(e) => write!(f, "{}", e),
            MapperError::Registry(e) => write!(f, "{}", e),
            MapperError::Copy(e) => write!(f, "{}", e),
            MapperError::Config(e) => write!(f, "{}", e),
            MapperError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for MapperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapperError::Declaration(e) => Some(e),
            MapperError::Registry(e) => Some(e),
            MapperError::Copy(e) => Some(e),
            MapperError::Config(e) => Some(e),
            MapperError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Localizable view of an error
///
/// `kind` is the stable error code, `domain` names the message catalog and
/// `parameters` are the interpolation values in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatableError {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub parameters: Vec<(String, String)>,
}

impl TranslatableError {
    /// Look up a parameter by key
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl MapperError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MapperError::Declaration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MapperError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MapperError::Copy(e) => e.status_code(),
            MapperError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MapperError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            MapperError::Declaration(_) => "INVALID_DECLARATION",
            MapperError::Registry(e) => e.error_code(),
            MapperError::Copy(e) => e.error_code(),
            MapperError::Config(_) => "CONFIG_ERROR",
            MapperError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message domain for catalog lookup
    pub fn domain(&self) -> Option<&'static str> {
        match self {
            MapperError::Declaration(_) | MapperError::Registry(_) | MapperError::Copy(_) => {
                Some(MAPPING_DOMAIN)
            }
            MapperError::Config(_) => Some(CONFIG_DOMAIN),
            MapperError::Internal(_) => None,
        }
    }

    /// Ordered interpolation parameters
    pub fn parameters(&self) -> Vec<(String, String)> {
        fn p(key: &str, value: &str) -> (String, String) {
            (key.to_string(), value.to_string())
        }

        match self {
            MapperError::Declaration(e) => match e {
                DeclarationError::InvalidResourceKind { kind } => {
                    vec![p("kind", kind), p("reason", "invalid_kind")]
                }
                DeclarationError::EmptyFieldList { kind } => {
                    vec![p("kind", kind), p("reason", "empty")]
                }
                DeclarationError::DuplicateField { kind, field } => {
                    vec![p("kind", kind), p("field", field), p("reason", "duplicate")]
                }
                DeclarationError::InvalidFieldName { kind, field } => {
                    vec![p("kind", kind), p("field", field), p("reason", "malformed")]
                }
            },
            MapperError::Registry(e) => match e {
                RegistryError::DuplicateRegistration { kind }
                | RegistryError::UnknownResourceKind { kind } => vec![p("kind", kind)],
            },
            MapperError::Copy(e) => match e {
                CopyError::Coercion {
                    field,
                    expected,
                    message,
                } => vec![
                    p("field", field),
                    p("expected", expected),
                    p("message", message),
                ],
                CopyError::UnknownProperty { kind, field } => {
                    vec![p("kind", kind), p("field", field)]
                }
                CopyError::InvalidPayload { message } => vec![p("message", message)],
            },
            MapperError::Config(e) => match e {
                ConfigError::ParseError { file, message } => {
                    let mut params = Vec::new();
                    if let Some(file) = file {
                        params.push(p("file", file));
                    }
                    params.push(p("message", message));
                    params
                }
                ConfigError::FileNotFound { path } => vec![p("path", path)],
                ConfigError::IoError { message } => vec![p("message", message)],
            },
            MapperError::Internal(_) => Vec::new(),
        }
    }

    /// Build the localizable view of this error
    pub fn translatable(&self) -> TranslatableError {
        TranslatableError {
            kind: self.error_code().to_string(),
            domain: self.domain().map(str::to_string),
            parameters: self.parameters(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        let params = self.parameters();
        if params.is_empty() {
            return None;
        }

        let map: serde_json::Map<String, serde_json::Value> = params
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        Some(serde_json::Value::Object(map))
    }
}

impl IntoResponse for MapperError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Declaration Errors
// =============================================================================

/// Errors raised while declaring a field allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// Resource kind is empty or not identifier-shaped
    InvalidResourceKind { kind: String },

    /// No field names were declared
    EmptyFieldList { kind: String },

    /// The same field name appears twice
    DuplicateField { kind: String, field: String },

    /// A field name is empty or not identifier-shaped
    InvalidFieldName { kind: String, field: String },
}

impl fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationError::InvalidResourceKind { kind } => {
                write!(f, "Invalid resource kind '{}'", kind)
            }
            DeclarationError::EmptyFieldList { kind } => {
                write!(f, "Field allow-list for '{}' declares no fields", kind)
            }
            DeclarationError::DuplicateField { kind, field } => {
                write!(
                    f,
                    "Field '{}' is declared more than once for '{}'",
                    field, kind
                )
            }
            DeclarationError::InvalidFieldName { kind, field } => {
                write!(f, "Invalid field name '{}' declared for '{}'", field, kind)
            }
        }
    }
}

impl std::error::Error for DeclarationError {}

impl From<DeclarationError> for MapperError {
    fn from(err: DeclarationError) -> Self {
        MapperError::Declaration(err)
    }
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors raised by the mapping registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A configuration for this kind is already registered
    DuplicateRegistration { kind: String },

    /// No configuration was registered for this kind
    UnknownResourceKind { kind: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateRegistration { kind } => {
                write!(f, "A mapping for '{}' is already registered", kind)
            }
            RegistryError::UnknownResourceKind { kind } => {
                write!(f, "No mapping registered for resource kind '{}'", kind)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

impl RegistryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateRegistration { .. } => "DUPLICATE_REGISTRATION",
            RegistryError::UnknownResourceKind { .. } => "UNKNOWN_RESOURCE_KIND",
        }
    }
}

impl From<RegistryError> for MapperError {
    fn from(err: RegistryError) -> Self {
        MapperError::Registry(err)
    }
}

// =============================================================================
// Copy Errors
// =============================================================================

/// Errors raised by the copier while writing allowed fields onto an entity
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CopyError {
    /// The payload value cannot be converted to the property type
    #[error("Cannot assign field '{field}' (expected {expected}): {message}")]
    Coercion {
        field: String,
        expected: String,
        message: String,
    },

    /// The allow-list names a property the entity does not expose
    #[error("'{kind}' has no settable property '{field}'")]
    UnknownProperty { kind: String, field: String },

    /// The payload is not a JSON object
    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },
}

impl CopyError {
    /// Shorthand for a coercion failure
    pub fn coercion(
        field: impl Into<String>,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CopyError::Coercion {
            field: field.into(),
            expected: expected.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CopyError::Coercion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CopyError::UnknownProperty { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CopyError::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CopyError::Coercion { .. } => "COERCION_FAILED",
            CopyError::UnknownProperty { .. } => "UNKNOWN_PROPERTY",
            CopyError::InvalidPayload { .. } => "INVALID_PAYLOAD",
        }
    }
}

impl From<CopyError> for MapperError {
    fn from(err: CopyError) -> Self {
        MapperError::Copy(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for MapperError {
    fn from(err: ConfigError) -> Self {
        MapperError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::Copy(CopyError::InvalidPayload {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for MapperError {
    fn from(err: std::io::Error) -> Self {
        MapperError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for MapperError {
    fn from(err: serde_yaml::Error) -> Self {
        MapperError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

/// Convert from anyhow::Error, keeping the typed error when one is wrapped
impl From<anyhow::Error> for MapperError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<MapperError>() {
            Ok(mapper_err) => mapper_err,
            Err(err) => MapperError::Internal(err.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for mapper operations
pub type MapperResult<T> = Result<T, MapperError>;

// =============================================================================
// Tests
// =============================================================================
