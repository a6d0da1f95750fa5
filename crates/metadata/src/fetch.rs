//! Movie and series gallery fetches with explicit outcomes.

use animeart_core::types::MappingInfo;
use tracing::debug;

use crate::MetadataError;
use crate::provider::{Gallery, GalleryProvider, RemoteIdLookup};
use crate::tvdb::resolve_tvdb_id;

/// Result of one gallery fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The provider answered for this title.
    Found(Gallery),
    /// The provider has no usable data for this title.
    Empty,
    /// The provider or a lookup it depends on failed.
    Failed(MetadataError),
}

impl FetchOutcome {
    fn from_response(result: Result<Gallery, MetadataError>) -> Self {
        match result {
            Ok(gallery) => Self::Found(gallery),
            Err(MetadataError::NotFound) => Self::Empty,
            Err(e) => Self::Failed(e),
        }
    }
}

impl std::fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found(_) => f.write_str("found"),
            Self::Empty => f.write_str("no match"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// Movie gallery, queried by TMDb ID when known, else by IMDb ID.
pub async fn fetch_movie_images(
    gallery: &dyn GalleryProvider,
    mapping: &MappingInfo,
) -> FetchOutcome {
    let Some(id) = mapping.tmdb().or(mapping.imdb()) else {
        return FetchOutcome::Failed(MetadataError::NotFound);
    };

    debug!(provider = gallery.name(), id, "fetching movie images");
    match FetchOutcome::from_response(gallery.movie_images(id).await) {
        FetchOutcome::Found(found) if found.is_empty() => FetchOutcome::Empty,
        outcome => outcome,
    }
}

/// Series gallery, queried by the resolved TVDB ID.
///
/// A response that does not echo a real TVDB ID is a placeholder and maps to
/// [`FetchOutcome::Empty`].
pub async fn fetch_series_images(
    gallery: &dyn GalleryProvider,
    remote_ids: &dyn RemoteIdLookup,
    mapping: &MappingInfo,
) -> FetchOutcome {
    let tvdb_id = match resolve_tvdb_id(remote_ids, mapping).await {
        Ok(id) => id,
        Err(e) => return FetchOutcome::Failed(e),
    };

    debug!(provider = gallery.name(), tvdb_id = %tvdb_id, "fetching series images");
    match FetchOutcome::from_response(gallery.series_images(&tvdb_id).await) {
        FetchOutcome::Found(found) if !found.matches_known_series() => FetchOutcome::Empty,
        outcome => outcome,
    }
}
