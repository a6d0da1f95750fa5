use std::time::Duration;

use animeart_core::types::{ImageCandidate, ImageResult, MappingInfo};

use crate::MetadataError;

/// Maps a primary catalog ID to the IDs other providers know the title by.
#[async_trait::async_trait]
pub trait IdMapper: Send + Sync {
    async fn get_mapping(&self, primary_id: &str) -> Result<Option<MappingInfo>, MetadataError>;
}

/// Cross-reference lookup of TVDB series IDs by IMDb ID.
#[async_trait::async_trait]
pub trait RemoteIdLookup: Send + Sync {
    async fn series_ids_by_imdb(&self, imdb_id: &str) -> Result<Vec<u64>, MetadataError>;
}

/// A per-title artwork gallery with movie and series entry points.
#[async_trait::async_trait]
pub trait GalleryProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Movie gallery by TMDb or IMDb ID.
    async fn movie_images(&self, id: &str) -> Result<Gallery, MetadataError>;

    /// Series gallery by TVDB ID.
    async fn series_images(&self, tvdb_id: &str) -> Result<Gallery, MetadataError>;
}

/// Existence check for a static image URL.
#[async_trait::async_trait]
pub trait ImageProbe: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}

/// Persistent store for resolved images.
#[async_trait::async_trait]
pub trait ImageCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ImageResult>, MetadataError>;

    async fn set(&self, key: &str, images: &ImageResult, ttl: Duration)
    -> Result<(), MetadataError>;
}

/// Candidate lists returned by a gallery provider for one title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    /// TVDB ID echoed back by the series endpoint. `None` or `"0"` means the
    /// provider answered with a placeholder rather than a real match.
    pub tvdb_id: Option<String>,
    pub hd_logos: Vec<ImageCandidate>,
    pub logos: Vec<ImageCandidate>,
    pub posters: Vec<ImageCandidate>,
    pub backgrounds: Vec<ImageCandidate>,
}

impl Gallery {
    pub fn is_empty(&self) -> bool {
        self.hd_logos.is_empty()
            && self.logos.is_empty()
            && self.posters.is_empty()
            && self.backgrounds.is_empty()
    }

    pub fn matches_known_series(&self) -> bool {
        self.tvdb_id
            .as_deref()
            .is_some_and(|id| !id.is_empty() && id != "0")
    }
}
