//! Axum extractor for allow-listed payloads
//!
//! `Mapped<T>` resolves the allow-list of `T`'s resource kind from the
//! `MappingRegistry` held in router state, parses the JSON body and drops
//! every key that is not allowed before the handler runs.

use crate::core::allow_list::FilteredPayload;
use crate::core::error::{CopyError, MapperError};
use crate::mapping::MappingRegistry;
use axum::{
    Json,
    extract::{FromRef, FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Types that name the resource kind their payloads are mapped as
pub trait MappedResource {
    const KIND: &'static str;
}

/// Axum extractor yielding the allowed part of a JSON body
///
/// Body rejections answer with an `INVALID_PAYLOAD` error under the status
/// axum chose for them; a body that is valid JSON but not an object is a 400.
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn update_like(
///     State(state): State<AppState>,
///     payload: Mapped<Like>,
/// ) -> Result<Json<Value>, MapperError> {
///     let mut like = state.load_like().await;
///     state.copier.assign(payload.into_inner(), &mut like)?;
///     Ok(Json(like.to_json()))
/// }
/// ```
pub struct Mapped<T>(pub FilteredPayload, PhantomData<T>);

impl<T> Mapped<T> {
    pub fn new(payload: FilteredPayload) -> Self {
        Self(payload, PhantomData)
    }

    /// Get the inner payload
    pub fn into_inner(self) -> FilteredPayload {
        self.0
    }
}

impl<T> std::ops::Deref for Mapped<T> {
    type Target = FilteredPayload;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Mapped<T>
where
    S: Send + Sync,
    T: MappedResource + Send + Sync,
    Arc<MappingRegistry>: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Resolve first: a missing mapping is a server defect whatever the body
        let registry = Arc::<MappingRegistry>::from_ref(state);
        let allow_list = registry
            .resolve(T::KIND)
            .map_err(IntoResponse::into_response)?;

        // Keep axum's status (415 for a missing content type, 400/422 otherwise)
        let Json(payload): Json<Value> = Json::from_request(req, state).await.map_err(|e| {
            let body = MapperError::Copy(CopyError::InvalidPayload {
                message: e.body_text(),
            })
            .to_response();
            (e.status(), Json(body)).into_response()
        })?;

        let Value::Object(map) = payload else {
            return Err(MapperError::Copy(CopyError::InvalidPayload {
                message: "expected a JSON object".to_string(),
            })
            .into_response());
        };

        Ok(Mapped::new(allow_list.filter(map)))
    }
}
