use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use animeart_core::types::ImageCandidate;
use animeart_metadata::ArtworkResolver;
use animeart_metadata::MetadataError;
use animeart_metadata::cache::MemoryImageCache;
use animeart_metadata::kitsu::{AnimeCatalog, AnimeRecord};
use animeart_metadata::provider::{Gallery, GalleryProvider, ImageProbe, RemoteIdLookup};
use animeart_metadata::select::{ImageSelector, LogoOverrides};
use animeart_metadata::store::{SqliteMappingStore, import_mappings};
use animeart_server::routes::build_router;
use animeart_server::state::AppState;
use axum_test::TestServer;
use serde_json::{Value, json};

/// Gallery that only knows the Cowboy Bebop series entry.
struct FixtureGallery {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl GalleryProvider for FixtureGallery {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn movie_images(&self, _id: &str) -> Result<Gallery, MetadataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MetadataError::NotFound)
    }

    async fn series_images(&self, tvdb_id: &str) -> Result<Gallery, MetadataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if tvdb_id != "76885" {
            return Ok(Gallery {
                tvdb_id: Some("0".into()),
                ..Default::default()
            });
        }
        Ok(Gallery {
            tvdb_id: Some("76885".into()),
            hd_logos: vec![ImageCandidate {
                id: Some("90919".into()),
                url: "https://assets.fanart.tv/fanart/tv/76885/hdtvlogo/cowboy-bebop.png".into(),
                language: Some("en".into()),
            }],
            posters: vec![ImageCandidate {
                id: Some("1".into()),
                url: "https://assets.fanart.tv/fanart/tv/76885/tvposter/cowboy-bebop.jpg".into(),
                language: Some("en".into()),
            }],
            ..Default::default()
        })
    }
}

struct NoRemoteIds;

#[async_trait::async_trait]
impl RemoteIdLookup for NoRemoteIds {
    async fn series_ids_by_imdb(&self, _imdb_id: &str) -> Result<Vec<u64>, MetadataError> {
        Ok(Vec::new())
    }
}

struct Reachable;

#[async_trait::async_trait]
impl ImageProbe for Reachable {
    async fn exists(&self, _url: &str) -> bool {
        true
    }
}

struct FixtureCatalog;

#[async_trait::async_trait]
impl AnimeCatalog for FixtureCatalog {
    async fn anime(&self, kitsu_id: &str) -> Result<AnimeRecord, MetadataError> {
        match kitsu_id {
            "3579" => Ok(AnimeRecord {
                data: json!({
                    "id": "3579",
                    "attributes": {
                        "subtype": "TV",
                        "titles": { "en": "Cowboy Bebop" },
                        "startDate": "1998-04-03",
                        "endDate": "1999-04-24",
                        "coverImage": { "original": "https://media.kitsu.io/anime/cover_images/1/original.jpg" }
                    }
                }),
                included: Vec::new(),
            }),
            "500" => Err(MetadataError::Network("timed out".into())),
            _ => Err(MetadataError::NotFound),
        }
    }
}

/// Create a test server backed by an in-memory SQLite database and fixture providers.
async fn test_app() -> (TestServer, Arc<FixtureGallery>) {
    let pool = animeart_db::connect(":memory:").await.unwrap();
    animeart_db::migrate::run(&pool).await.unwrap();

    import_mappings(
        &pool,
        &json!({
            "1": { "imdb_id": "tt0816407" },
            "3579": { "imdb_id": "tt0213338", "tvdb_id": "76885" },
            "9": { "title": "No ids" }
        }),
    )
    .await
    .unwrap();

    let gallery = Arc::new(FixtureGallery {
        calls: AtomicUsize::new(0),
    });
    let resolver = ArtworkResolver::new(
        Arc::new(SqliteMappingStore::new(pool.clone())),
        gallery.clone(),
        Arc::new(NoRemoteIds),
        Arc::new(Reachable),
        Arc::new(MemoryImageCache::new()),
        ImageSelector::new(LogoOverrides::builtin()),
    );

    let state = AppState {
        db: pool,
        resolver: Arc::new(resolver),
        catalog: Arc::new(FixtureCatalog),
    };

    (TestServer::new(build_router(state)).unwrap(), gallery)
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (server, _) = test_app().await;
    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn images_fall_back_to_metahub_for_unmatched_series() {
    let (server, _) = test_app().await;
    let resp = server.get("/api/v1/images/kitsu:1?type=series").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(
        body,
        json!({
            "logo": "https://images.metahub.space/logo/medium/tt0816407/img",
            "background": "https://images.metahub.space/background/medium/tt0816407/img"
        })
    );
}

#[tokio::test]
async fn images_for_matched_series() {
    let (server, gallery) = test_app().await;
    let resp = server.get("/api/v1/images/3579").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(
        body["logo"],
        "https://assets.fanart.tv/fanart/tv/76885/hdtvlogo/cowboy-bebop.png"
    );
    assert_eq!(
        body["poster"],
        "https://assets.fanart.tv/fanart/tv/76885/tvposter/cowboy-bebop.jpg"
    );
    assert_eq!(
        body["background"],
        "https://images.metahub.space/background/medium/tt0213338/img"
    );

    // Second request is served from cache.
    server.get("/api/v1/images/3579").await.assert_status_ok();
    assert_eq!(gallery.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn images_for_unmapped_title_are_empty() {
    let (server, gallery) = test_app().await;
    for id in ["9", "404"] {
        let resp = server.get(&format!("/api/v1/images/{id}?type=movie")).await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body, json!({}));
    }
    assert_eq!(gallery.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn images_reject_unknown_type() {
    let (server, _) = test_app().await;
    let resp = server.get("/api/v1/images/1?type=anime").await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn meta_combines_catalog_and_artwork() {
    let (server, _) = test_app().await;
    let resp = server.get("/api/v1/meta/kitsu:3579").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["id"], "kitsu:3579");
    assert_eq!(body["type"], "series");
    assert_eq!(body["name"], "Cowboy Bebop");
    assert_eq!(body["releaseInfo"], "1998-1999");
    assert_eq!(
        body["logo"],
        "https://assets.fanart.tv/fanart/tv/76885/hdtvlogo/cowboy-bebop.png"
    );
    assert_eq!(
        body["poster"],
        "https://assets.fanart.tv/fanart/tv/76885/tvposter/cowboy-bebop.jpg"
    );
    assert_eq!(
        body["background"],
        "https://media.kitsu.io/anime/cover_images/1/original.jpg"
    );
}

#[tokio::test]
async fn meta_errors_use_envelope() {
    let (server, _) = test_app().await;

    let resp = server.get("/api/v1/meta/404").await;
    resp.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "not_found");

    let resp = server.get("/api/v1/meta/500").await;
    resp.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "upstream_unavailable");
}
