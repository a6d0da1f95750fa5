use std::path::PathBuf;
use std::time::Duration;

use animeart_metadata::resolver::DEFAULT_CACHE_TTL;

/// Runtime configuration, read from `ANIMEART_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub bind_addr: String,
    pub fanart_api_key: Option<String>,
    pub mapping_file: Option<PathBuf>,
    pub image_cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: "animeart.db".to_string(),
            bind_addr: "0.0.0.0:7000".to_string(),
            fanart_api_key: None,
            mapping_file: None,
            image_cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key).and_then(|value| {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed)
                }
            })
        };
        let defaults = Self::default();

        Self {
            db_path: var("ANIMEART_DB").unwrap_or(defaults.db_path),
            bind_addr: var("ANIMEART_BIND").unwrap_or(defaults.bind_addr),
            fanart_api_key: var("ANIMEART_FANART_KEY"),
            mapping_file: var("ANIMEART_MAPPING_FILE").map(PathBuf::from),
            image_cache_ttl: var("ANIMEART_IMAGE_CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.image_cache_ttl),
        }
    }
}
