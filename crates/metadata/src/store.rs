//! SQLite-backed identifier mapper and image cache.

use std::time::Duration;

use animeart_core::types::{ImageResult, MappingInfo};
use animeart_db::repo::{image_cache, mappings};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::MetadataError;
use crate::provider::{IdMapper, ImageCache};

/// [`IdMapper`] reading the `id_mapping` table.
#[derive(Clone)]
pub struct SqliteMappingStore {
    pool: SqlitePool,
}

impl SqliteMappingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IdMapper for SqliteMappingStore {
    async fn get_mapping(&self, primary_id: &str) -> Result<Option<MappingInfo>, MetadataError> {
        let row = mappings::get(&self.pool, primary_id).await?;
        Ok(row.map(|r| MappingInfo {
            primary_id: Some(r.primary_id),
            imdb_id: r.imdb_id,
            tmdb_id: r.tmdb_id,
            tvdb_id: r.tvdb_id,
        }))
    }
}

/// [`ImageCache`] persisting JSON payloads in the `image_cache` table.
#[derive(Clone)]
pub struct SqliteImageCache {
    pool: SqlitePool,
}

impl SqliteImageCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ImageCache for SqliteImageCache {
    async fn get(&self, key: &str) -> Result<Option<ImageResult>, MetadataError> {
        let Some(payload) = image_cache::get(&self.pool, key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|e| MetadataError::Cache(format!("decode {key}: {e}")))
    }

    async fn set(
        &self,
        key: &str,
        images: &ImageResult,
        ttl: Duration,
    ) -> Result<(), MetadataError> {
        let payload = serde_json::to_string(images)
            .map_err(|e| MetadataError::Cache(format!("encode {key}: {e}")))?;
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX / 2);
        image_cache::set(&self.pool, key, &payload, ttl_secs).await?;
        Ok(())
    }
}

/// Import a mapping document keyed by primary ID:
///
/// ```json
/// { "1": { "imdb_id": "tt0816407", "tvdb_id": 81797 } }
/// ```
///
/// IDs may be strings or numbers; other fields are ignored. Entries without
/// any provider ID are skipped. Returns the number of rows written.
pub async fn import_mappings(
    pool: &SqlitePool,
    document: &serde_json::Value,
) -> Result<usize, MetadataError> {
    let Some(entries) = document.as_object() else {
        return Err(MetadataError::Provider(
            "mapping document must be a JSON object".into(),
        ));
    };

    let mut written = 0;
    for (primary_id, entry) in entries {
        let row = mappings::MappingRow {
            primary_id: primary_id.clone(),
            imdb_id: id_field(&entry["imdb_id"]),
            tmdb_id: id_field(&entry["tmdb_id"]),
            tvdb_id: id_field(&entry["tvdb_id"]),
        };
        if row.imdb_id.is_none() && row.tmdb_id.is_none() && row.tvdb_id.is_none() {
            debug!(primary_id = %primary_id, "skipping mapping without provider ids");
            continue;
        }
        mappings::upsert(pool, &row).await?;
        written += 1;
    }

    info!(written, total = entries.len(), "imported id mappings");
    Ok(written)
}

fn id_field(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
