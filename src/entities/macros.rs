//! Macros for reducing boilerplate when declaring mappable entities

/// Implement `MappableEntity` for a plain struct
///
/// Each entry maps an inbound property name to a struct field and its type.
/// The type must implement `FieldType`.
///
/// # Example
/// ```rust,ignore
/// #[derive(Default)]
/// struct Like {
///     title: String,
///     user_id: i64,
///     photo: Option<String>,
/// }
///
/// impl_mappable_entity!(Like, "Like", {
///     "title" => title: String,
///     "userId" => user_id: i64,
///     "photo" => photo: Option<String>,
/// });
/// ```
#[macro_export]
macro_rules! impl_mappable_entity {
    (@mismatch $name:expr, $ty:ty) => {
        $crate::core::error::CopyError::coercion(
            $name,
            <$ty as $crate::core::entity::FieldType>::field_kind().describe(),
            "value does not match property type",
        )
    };

    (@unknown $kind:literal, $name:expr) => {
        $crate::core::error::CopyError::UnknownProperty {
            kind: $kind.to_string(),
            field: $name.to_string(),
        }
    };

    ($type:ident, $kind:literal, { $($name:literal => $field:ident : $ty:ty),* $(,)? }) => {
        impl $crate::core::entity::MappableEntity for $type {
            fn resource_kind(&self) -> &str {
                $kind
            }

            fn field_kind(&self, name: &str) -> Option<$crate::core::field::FieldKind> {
                match name {
                    $($name => Some(<$ty as $crate::core::entity::FieldType>::field_kind()),)*
                    _ => None,
                }
            }

            fn check_field(
                &self,
                name: &str,
                value: &$crate::core::field::FieldValue,
            ) -> Result<(), $crate::core::error::CopyError> {
                match name {
                    $($name => {
                        <$ty as $crate::core::entity::FieldType>::from_field_value(value.clone())
                            .map(|_| ())
                            .ok_or_else(|| $crate::impl_mappable_entity!(@mismatch name, $ty))
                    })*
                    _ => Err($crate::impl_mappable_entity!(@unknown $kind, name)),
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::core::field::FieldValue,
            ) -> Result<(), $crate::core::error::CopyError> {
                match name {
                    $($name => {
                        self.$field = <$ty as $crate::core::entity::FieldType>::from_field_value(value)
                            .ok_or_else(|| $crate::impl_mappable_entity!(@mismatch name, $ty))?;
                        Ok(())
                    })*
                    _ => Err($crate::impl_mappable_entity!(@unknown $kind, name)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::entity::MappableEntity;
    use crate::core::error::CopyError;
    use crate::core::field::{FieldKind, FieldValue};

    #[derive(Debug, Default)]
    struct Like {
        title: String,
        user_id: i64,
        photo: Option<String>,
    }

    impl_mappable_entity!(Like, "Like", {
        "title" => title: String,
        "userId" => user_id: i64,
        "photo" => photo: Option<String>,
    });

    #[test]
    fn test_macro_routes_names_to_fields() {
        let mut like = Like::default();
        like.set_field("title", FieldValue::String("hi".to_string()))
            .unwrap();
        like.set_field("userId", FieldValue::Integer(7)).unwrap();
        like.set_field("photo", FieldValue::Null).unwrap();

        assert_eq!(like.title, "hi");
        assert_eq!(like.user_id, 7);
        assert_eq!(like.photo, None);
        assert_eq!(like.resource_kind(), "Like");
    }

    #[test]
    fn test_macro_field_kinds() {
        let like = Like::default();
        assert_eq!(like.field_kind("userId"), Some(FieldKind::Integer));
        assert_eq!(
            like.field_kind("photo"),
            Some(FieldKind::optional(FieldKind::String))
        );
        assert_eq!(like.field_kind("user_id"), None);
    }

    #[test]
    fn test_macro_type_mismatch() {
        let mut like = Like::default();
        let err = like
            .set_field("userId", FieldValue::String("x".to_string()))
            .unwrap_err();
        assert!(matches!(err, CopyError::Coercion { .. }));
    }

    #[derive(Debug, Default)]
    struct Counter {
        label: String,
        count: i32,
    }

    impl_mappable_entity!(Counter, "Counter", {
        "label" => label: String,
        "count" => count: i32,
    });

    #[test]
    fn test_macro_check_field_does_not_write() {
        let counter = Counter::default();
        assert!(
            counter
                .check_field("label", &FieldValue::String("x".to_string()))
                .is_ok()
        );
        let err = counter
            .check_field("count", &FieldValue::Integer(3_000_000_000))
            .unwrap_err();
        assert!(matches!(err, CopyError::Coercion { ref field, .. } if field == "count"));
        assert!(matches!(
            counter.check_field("admin", &FieldValue::Boolean(true)),
            Err(CopyError::UnknownProperty { .. })
        ));
        assert_eq!(counter.label, "");
        assert_eq!(counter.count, 0);
    }

    #[test]
    fn test_macro_unknown_property() {
        let mut like = Like::default();
        let err = like.set_field("admin", FieldValue::Boolean(true)).unwrap_err();
        assert_eq!(
            err,
            CopyError::UnknownProperty {
                kind: "Like".to_string(),
                field: "admin".to_string()
            }
        );
    }
}
