//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Errors expose stable codes, domains and parameters for translation
//! - Error matching allows clients to handle specific cases

use axum::http::StatusCode;
use axum::response::IntoResponse;
use this_mapper::core::error::{CONFIG_DOMAIN, MAPPING_DOMAIN};
use this_mapper::prelude::*;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_unknown_resource_kind_returns_500() {
        let err = MapperError::Registry(RegistryError::UnknownResourceKind {
            kind: "Comment".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_declaration_error_returns_500() {
        let err = MapperError::Declaration(DeclarationError::EmptyFieldList {
            kind: "Like".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_coercion_error_returns_422() {
        let err = MapperError::Copy(CopyError::coercion("userId", "integer", "got string"));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_invalid_payload_returns_400() {
        let err = MapperError::Copy(CopyError::InvalidPayload {
            message: "expected a JSON object".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_returns_500() {
        let err = MapperError::Config(ConfigError::ParseError {
            file: Some("mappings.yaml".to_string()),
            message: "invalid syntax".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Translation Tests
// =============================================================================

mod translation_tests {
    use super::*;

    #[test]
    fn test_core_errors_use_mapping_domain() {
        let errors: Vec<MapperError> = vec![
            DeclarationError::EmptyFieldList {
                kind: "Like".to_string(),
            }
            .into(),
            RegistryError::DuplicateRegistration {
                kind: "Like".to_string(),
            }
            .into(),
            CopyError::InvalidPayload {
                message: "x".to_string(),
            }
            .into(),
        ];

        for err in errors {
            assert_eq!(err.translatable().domain.as_deref(), Some(MAPPING_DOMAIN));
        }
    }

    #[test]
    fn test_config_errors_use_config_domain() {
        let err = MapperError::Config(ConfigError::FileNotFound {
            path: "/etc/mappings.yaml".to_string(),
        });
        let t = err.translatable();
        assert_eq!(t.domain.as_deref(), Some(CONFIG_DOMAIN));
        assert_eq!(t.parameter("path"), Some("/etc/mappings.yaml"));
    }

    #[test]
    fn test_invalid_field_name_parameters() {
        let err: MapperError = FieldAllowList::define("Like", ["title", "2fa"])
            .unwrap_err()
            .into();
        let t = err.translatable();
        assert_eq!(t.kind, "INVALID_DECLARATION");
        assert_eq!(
            t.parameters,
            vec![
                ("kind".to_string(), "Like".to_string()),
                ("field".to_string(), "2fa".to_string()),
                ("reason".to_string(), "malformed".to_string()),
            ]
        );
    }

    #[test]
    fn test_translatable_serializes() {
        let err = MapperError::Registry(RegistryError::UnknownResourceKind {
            kind: "Comment".to_string(),
        });
        let value = serde_json::to_value(err.translatable()).unwrap();
        assert_eq!(value["kind"], "UNKNOWN_RESOURCE_KIND");
        assert_eq!(value["domain"], "mapping");
        assert_eq!(value["parameters"], json!([["kind", "Comment"]]));
    }
}

// =============================================================================
// Response Tests
// =============================================================================

mod response_tests {
    use super::*;

    #[test]
    fn test_into_response_status() {
        let err = MapperError::Copy(CopyError::coercion("userId", "integer", "got string"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_error_response_has_details() {
        let err = MapperError::Registry(RegistryError::DuplicateRegistration {
            kind: "Like".to_string(),
        });
        let response = err.to_response();
        assert_eq!(response.code, "DUPLICATE_REGISTRATION");
        assert!(response.message.contains("Like"));
        assert_eq!(response.details, Some(json!({ "kind": "Like" })));
    }

    #[test]
    fn test_error_response_skips_empty_details() {
        let response = MapperError::Internal("boom".to_string()).to_response();
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("details").is_none());
        assert_eq!(value["code"], "INTERNAL_ERROR");
    }
}

// =============================================================================
// Error Matching Tests
// =============================================================================

mod matching_tests {
    use super::*;

    fn describe(result: MapperResult<()>) -> &'static str {
        match result {
            Ok(()) => "ok",
            Err(MapperError::Declaration(_)) => "bad declaration",
            Err(MapperError::Registry(RegistryError::DuplicateRegistration { .. })) => "duplicate",
            Err(MapperError::Registry(RegistryError::UnknownResourceKind { .. })) => "unknown",
            Err(MapperError::Copy(_)) => "copy",
            Err(_) => "other",
        }
    }

    #[test]
    fn test_clients_can_match_categories() {
        let registry = MappingRegistry::new();
        assert_eq!(describe(registry.resolve("Like").map(|_| ())), "unknown");

        let list = FieldAllowList::define("Like", ["title"]).unwrap();
        assert_eq!(describe(registry.register(list.clone()).map(|_| ())), "ok");
        assert_eq!(describe(registry.register(list).map(|_| ())), "duplicate");

        let declared = FieldAllowList::define("Like", ["title", "title"])
            .map(|_| ())
            .map_err(MapperError::from);
        assert_eq!(describe(declared), "bad declaration");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = MapperError::Registry(RegistryError::UnknownResourceKind {
            kind: "Comment".to_string(),
        });
        assert!(err.source().is_some());
        assert!(MapperError::Internal("x".to_string()).source().is_none());
    }
}
