use std::sync::Arc;

use animeart_metadata::ArtworkResolver;
use animeart_metadata::kitsu::AnimeCatalog;
use sqlx::SqlitePool;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub resolver: Arc<ArtworkResolver>,
    pub catalog: Arc<dyn AnimeCatalog>,
}
