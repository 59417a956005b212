//! Like API demo: allow-listed updates of a profile "Like"
//!
//! ```bash
//! RUST_LOG=debug cargo run --example like_api
//! curl -X PUT localhost:3000/likes -H 'content-type: application/json' \
//!      -d '{"title":"hi","admin":true,"userId":7,"gender":"other"}'
//! ```

use axum::{Json, Router, extract::State, routing::put};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use this_mapper::prelude::*;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Enum property mapped from its string form
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "lowercase")]
enum Gender {
    Female,
    Male,
    #[default]
    Other,
}

impl FieldType for Gender {
    fn field_kind() -> FieldKind {
        FieldKind::enumeration(["female", "male", "other"])
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value.as_string()? {
            "female" => Some(Gender::Female),
            "male" => Some(Gender::Male),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Like {
    title: String,
    description: Option<String>,
    user_id: i64,
    photo: Option<String>,
    birthday: Option<DateTime<Utc>>,
    gender: Gender,
    google_id: Option<String>,
    github_id: Option<String>,
    github_url: Option<String>,
    instagram_url: Option<String>,
    linked_in_id: Option<String>,
    linked_in_url: Option<String>,
    twitter_url: Option<String>,
    facebook_url: Option<String>,
    phone: Option<String>,
    // Not in the allow-list: never writable from a request
    admin: bool,
}

impl_mappable_entity!(Like, "Like", {
    "title" => title: String,
    "description" => description: Option<String>,
    "userId" => user_id: i64,
    "photo" => photo: Option<String>,
    "birthday" => birthday: Option<DateTime<Utc>>,
    "gender" => gender: Gender,
    "googleId" => google_id: Option<String>,
    "githubId" => github_id: Option<String>,
    "githubUrl" => github_url: Option<String>,
    "instagramUrl" => instagram_url: Option<String>,
    "linkedInId" => linked_in_id: Option<String>,
    "linkedInUrl" => linked_in_url: Option<String>,
    "twitterUrl" => twitter_url: Option<String>,
    "facebookUrl" => facebook_url: Option<String>,
    "phone" => phone: Option<String>,
    "admin" => admin: bool,
});

impl MappedResource for Like {
    const KIND: &'static str = "Like";
}

#[derive(Clone)]
struct AppState {
    registry: Arc<MappingRegistry>,
    copier: Copier,
    like: Arc<Mutex<Like>>,
}

impl axum::extract::FromRef<AppState> for Arc<MappingRegistry> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.registry)
    }
}

async fn update_like(
    State(state): State<AppState>,
    payload: Mapped<Like>,
) -> Result<Json<Value>, MapperError> {
    let mut like = state.like.lock().await;
    let report = state.copier.assign(payload.into_inner(), &mut *like)?;

    Ok(Json(json!({
        "like": &*like,
        "report": report,
    })))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let registry = Arc::new(
        RegistryBuilder::new()
            .with_config(MappingsConfig::default_config())
            .build()?,
    );
    registry.ensure_registered([Like::KIND])?;

    let state = AppState {
        registry,
        copier: Copier::default(),
        like: Arc::new(Mutex::new(Like::default())),
    };

    let app = Router::new()
        .route("/likes", put(update_like))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Like API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
