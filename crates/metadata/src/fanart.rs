//! fanart.tv gallery client.
//!
//! Uses the v3 API: https://fanarttv.docs.apiary.io

use animeart_core::types::ImageCandidate;
use tracing::debug;

use crate::MetadataError;
use crate::provider::{Gallery, GalleryProvider};

const BASE_URL: &str = "https://webservice.fanart.tv/v3";

pub struct FanartClient {
    api_key: String,
    client: reqwest::Client,
}

impl FanartClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            client: crate::http_client(),
        }
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, MetadataError> {
        if self.api_key.is_empty() {
            return Err(MetadataError::Provider(
                "fanart.tv api key not configured".into(),
            ));
        }

        let url = format!("{BASE_URL}{path}");
        debug!(url = %url, "fanart.tv request");

        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "fanart.tv returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl GalleryProvider for FanartClient {
    fn name(&self) -> &str {
        "fanart.tv"
    }

    async fn movie_images(&self, id: &str) -> Result<Gallery, MetadataError> {
        let data = self.get_json(&format!("/movies/{id}")).await?;
        Ok(parse_movie_gallery(&data))
    }

    async fn series_images(&self, tvdb_id: &str) -> Result<Gallery, MetadataError> {
        let data = self.get_json(&format!("/tv/{tvdb_id}")).await?;
        Ok(parse_series_gallery(&data))
    }
}

fn parse_movie_gallery(data: &serde_json::Value) -> Gallery {
    Gallery {
        tvdb_id: None,
        hd_logos: parse_candidates(data, "hdmovielogo"),
        logos: parse_candidates(data, "movielogo"),
        posters: parse_candidates(data, "movieposter"),
        backgrounds: parse_candidates(data, "moviebackground"),
    }
}

fn parse_series_gallery(data: &serde_json::Value) -> Gallery {
    Gallery {
        tvdb_id: id_string(&data["thetvdb_id"]),
        hd_logos: parse_candidates(data, "hdtvlogo"),
        logos: parse_candidates(data, "clearlogo"),
        posters: parse_candidates(data, "tvposter"),
        backgrounds: parse_candidates(data, "showbackground"),
    }
}

fn parse_candidates(data: &serde_json::Value, key: &str) -> Vec<ImageCandidate> {
    data[key]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let url = entry["url"].as_str().filter(|u| !u.is_empty())?;
                    Some(ImageCandidate {
                        id: id_string(&entry["id"]),
                        url: url.to_string(),
                        language: entry["lang"]
                            .as_str()
                            .filter(|l| !l.is_empty())
                            .map(|l| l.to_string()),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// fanart.tv sends IDs as strings, but tolerate bare numbers.
fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
