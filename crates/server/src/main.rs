use std::sync::Arc;

use animeart_metadata::ArtworkResolver;
use animeart_metadata::fanart::FanartClient;
use animeart_metadata::kitsu::KitsuClient;
use animeart_metadata::metahub::HttpProbe;
use animeart_metadata::select::{ImageSelector, LogoOverrides};
use animeart_metadata::store::{SqliteImageCache, SqliteMappingStore, import_mappings};
use animeart_metadata::tvdb::TvdbClient;
use animeart_server::config::ServerConfig;
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env();
    info!(db_path = %config.db_path, "connecting to database");

    let pool = animeart_db::connect(&config.db_path)
        .await
        .context("failed to connect to database")?;

    animeart_db::migrate::run(&pool)
        .await
        .context("failed to run migrations")?;
    info!("migrations complete");

    if let Some(path) = config.mapping_file.as_ref() {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read mapping file {}", path.display()))?;
        let document: serde_json::Value =
            serde_json::from_str(&raw).context("mapping file is not valid JSON")?;
        import_mappings(&pool, &document)
            .await
            .context("failed to import id mappings")?;
    }

    let mapped = animeart_db::repo::mappings::count(&pool)
        .await
        .context("failed to count id mappings")?;
    if mapped == 0 {
        warn!("no id mappings stored; every title will resolve to no artwork");
    } else {
        info!(mapped, "id mappings available");
    }

    let fanart_key = config.fanart_api_key.clone().unwrap_or_default();
    if fanart_key.is_empty() {
        warn!("ANIMEART_FANART_KEY is not set; only fallback artwork will be resolved");
    }

    let resolver = ArtworkResolver::new(
        Arc::new(SqliteMappingStore::new(pool.clone())),
        Arc::new(FanartClient::new(fanart_key)),
        Arc::new(TvdbClient::new()),
        Arc::new(HttpProbe::new()),
        Arc::new(SqliteImageCache::new(pool.clone())),
        ImageSelector::new(LogoOverrides::builtin()),
    )
    .with_cache_ttl(config.image_cache_ttl);

    // Spawn expired cache cleanup task
    {
        let pool = pool.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                match animeart_db::repo::image_cache::purge_expired(&pool).await {
                    Ok(removed) if removed > 0 => info!(removed, "purged expired image cache rows"),
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "image cache purge failed"),
                }
            }
        });
    }

    let app_state = animeart_server::state::AppState {
        db: pool,
        resolver: Arc::new(resolver),
        catalog: Arc::new(KitsuClient::new()),
    };

    let app = animeart_server::routes::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
