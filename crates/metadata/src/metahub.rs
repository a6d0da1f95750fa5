//! metahub static image convention, used to fill slots the gallery left empty.

use animeart_core::types::AssetSlot;
use tracing::debug;

use crate::provider::ImageProbe;

const BASE_URL: &str = "https://images.metahub.space";

/// Convention URL for a slot. metahub serves no posters.
pub fn fallback_url(slot: AssetSlot, imdb_id: &str) -> Option<String> {
    match slot {
        AssetSlot::Logo => Some(format!("{BASE_URL}/logo/medium/{imdb_id}/img")),
        AssetSlot::Background => Some(format!("{BASE_URL}/background/medium/{imdb_id}/img")),
        AssetSlot::Poster => None,
    }
}

/// Return `url` only when the probe confirms it is reachable.
pub async fn check_if_exists(probe: &dyn ImageProbe, url: &str) -> Option<String> {
    if probe.exists(url).await {
        Some(url.to_string())
    } else {
        debug!(url, "fallback image not found");
        None
    }
}

/// Probes URLs with a `HEAD` request, following redirects.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            client: crate::http_client(),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ImageProbe for HttpProbe {
    async fn exists(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(url, error = %e, "existence probe failed");
                false
            }
        }
    }
}
