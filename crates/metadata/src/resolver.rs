//! Artwork resolution across gallery and fallback providers.
//!
//! Order of operations for one title:
//! 1. Map the primary ID to provider IDs; without any, resolve to nothing.
//! 2. Coalesce on the cache key and serve cached results.
//! 3. Movie gallery for movies and TMDb-mapped titles; series gallery
//!    otherwise, retried as a movie when the series path has no match.
//! 4. Fill logo and background from metahub when an IMDb ID is known.

use std::sync::Arc;
use std::time::Duration;

use animeart_core::types::{AssetSlot, ContentType, ImageResult, MappingInfo};
use tracing::{debug, warn};

use crate::cache::SingleFlight;
use crate::fetch::{FetchOutcome, fetch_movie_images, fetch_series_images};
use crate::metahub;
use crate::provider::{GalleryProvider, IdMapper, ImageCache, ImageProbe, RemoteIdLookup};
use crate::select::ImageSelector;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub struct ArtworkResolver {
    mapper: Arc<dyn IdMapper>,
    gallery: Arc<dyn GalleryProvider>,
    remote_ids: Arc<dyn RemoteIdLookup>,
    probe: Arc<dyn ImageProbe>,
    cache: Arc<dyn ImageCache>,
    selector: ImageSelector,
    cache_ttl: Duration,
    in_flight: SingleFlight<ImageResult>,
}

impl ArtworkResolver {
    pub fn new(
        mapper: Arc<dyn IdMapper>,
        gallery: Arc<dyn GalleryProvider>,
        remote_ids: Arc<dyn RemoteIdLookup>,
        probe: Arc<dyn ImageProbe>,
        cache: Arc<dyn ImageCache>,
        selector: ImageSelector,
    ) -> Self {
        Self {
            mapper,
            gallery,
            remote_ids,
            probe,
            cache,
            selector,
            cache_ttl: DEFAULT_CACHE_TTL,
            in_flight: SingleFlight::new(),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Resolve logo, poster and background for a title. Never fails: any
    /// provider error leaves the affected slots empty.
    pub async fn get_images(&self, primary_id: &str, content_type: ContentType) -> ImageResult {
        let mapping = match self.mapper.get_mapping(primary_id).await {
            Ok(Some(mapping)) if mapping.has_provider_id() => mapping,
            Ok(_) => {
                debug!(primary_id, "no provider ids known");
                return ImageResult::default();
            }
            Err(e) => {
                warn!(primary_id, error = %e, "id mapping lookup failed");
                return ImageResult::default();
            }
        };

        let Some(cache_key) = mapping.cache_key(primary_id) else {
            return ImageResult::default();
        };

        self.in_flight
            .run(&cache_key, || {
                self.cached_resolve(&cache_key, primary_id, &mapping, content_type)
            })
            .await
    }

    async fn cached_resolve(
        &self,
        cache_key: &str,
        primary_id: &str,
        mapping: &MappingInfo,
        content_type: ContentType,
    ) -> ImageResult {
        match self.cache.get(cache_key).await {
            Ok(Some(images)) => {
                debug!(cache_key, "image cache hit");
                return images;
            }
            Ok(None) => {}
            Err(e) => warn!(cache_key, error = %e, "image cache read failed"),
        }

        let images = self.resolve(primary_id, mapping, content_type).await;

        if let Err(e) = self.cache.set(cache_key, &images, self.cache_ttl).await {
            warn!(cache_key, error = %e, "image cache write failed");
        }
        images
    }

    async fn resolve(
        &self,
        primary_id: &str,
        mapping: &MappingInfo,
        content_type: ContentType,
    ) -> ImageResult {
        let mut images = match self.fetch_gallery(mapping, content_type).await {
            FetchOutcome::Found(gallery) => {
                self.selector.select_images(primary_id, mapping, &gallery)
            }
            FetchOutcome::Empty => ImageResult::default(),
            FetchOutcome::Failed(e) => {
                warn!(primary_id, error = %e, "gallery provider failed");
                ImageResult::default()
            }
        };

        self.fill_from_fallback(mapping, &mut images).await;
        debug!(primary_id, ?images, "resolved images");
        images
    }

    async fn fetch_gallery(&self, mapping: &MappingInfo, content_type: ContentType) -> FetchOutcome {
        let gallery = self.gallery.as_ref();
        if content_type == ContentType::Movie || mapping.tmdb().is_some() {
            return fetch_movie_images(gallery, mapping).await;
        }

        match fetch_series_images(gallery, self.remote_ids.as_ref(), mapping).await {
            FetchOutcome::Found(found) => FetchOutcome::Found(found),
            outcome => {
                debug!(outcome = %outcome, "series path unavailable, retrying as movie");
                fetch_movie_images(gallery, mapping).await
            }
        }
    }

    async fn fill_from_fallback(&self, mapping: &MappingInfo, images: &mut ImageResult) {
        let Some(imdb_id) = mapping.imdb() else {
            return;
        };

        for slot in [AssetSlot::Logo, AssetSlot::Poster, AssetSlot::Background] {
            if images.get(slot).is_some() {
                continue;
            }
            if let Some(url) = metahub::fallback_url(slot, imdb_id) {
                debug!(%slot, imdb_id, "trying fallback artwork");
                images.set(
                    slot,
                    metahub::check_if_exists(self.probe.as_ref(), &url).await,
                );
            }
        }
    }
}
