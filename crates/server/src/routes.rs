use animeart_core::error::ApiError;
use animeart_core::types::{ContentType, ImageResult};
use animeart_metadata::MetadataError;
use animeart_metadata::kitsu::{self, AnimeMeta};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/images/{id}", get(get_images))
        .route("/meta/{id}", get(get_meta))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::Internal(format!("database check failed: {e}")))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ImagesQuery {
    #[serde(rename = "type")]
    content_type: Option<String>,
}

async fn get_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ImagesQuery>,
) -> Result<Json<ImageResult>, AppError> {
    let primary_id = primary_id(&id)?;
    let content_type = match query.content_type.as_deref() {
        None => ContentType::Series,
        Some(raw) => raw.parse::<ContentType>().map_err(ApiError::BadRequest)?,
    };

    Ok(Json(state.resolver.get_images(primary_id, content_type).await))
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

async fn get_meta(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnimeMeta>, AppError> {
    let primary_id = primary_id(&id)?;
    let record = state
        .catalog
        .anime(primary_id)
        .await
        .map_err(|e| match e {
            MetadataError::NotFound => ApiError::NotFound(format!("anime {primary_id}")),
            other => ApiError::Upstream(other.to_string()),
        })?;

    let mut meta = kitsu::to_meta(&record);
    let content_type = meta.content_type.unwrap_or(ContentType::Series);
    let images = state.resolver.get_images(primary_id, content_type).await;

    meta.logo = images.logo;
    meta.poster = meta.poster.or(images.poster);
    meta.background = meta.background.or(images.background);

    Ok(Json(meta))
}

/// Accepts `123` or `kitsu:123`.
fn primary_id(raw: &str) -> Result<&str, ApiError> {
    let id = raw.strip_prefix("kitsu:").unwrap_or(raw).trim();
    if id.is_empty() {
        return Err(ApiError::BadRequest("missing id".into()));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_id_strips_kitsu_prefix() {
        assert_eq!(primary_id("kitsu:3579").unwrap(), "3579");
        assert_eq!(primary_id("3579").unwrap(), "3579");
        assert!(primary_id("kitsu:").is_err());
    }
}
