//! TVDB cross-reference lookup and series ID resolution.

use animeart_core::types::MappingInfo;
use serde::Deserialize;
use tracing::debug;

use crate::MetadataError;
use crate::provider::RemoteIdLookup;

const BASE_URL: &str = "https://thetvdb.com/api";

/// `<Data>` root of a `GetSeriesByRemoteID` response.
#[derive(Debug, Deserialize)]
struct RemoteIdResponse {
    #[serde(rename = "Series", default)]
    series: Vec<RemoteSeries>,
}

#[derive(Debug, Deserialize)]
struct RemoteSeries {
    seriesid: Option<String>,
    id: Option<String>,
}

/// Client for the legacy `GetSeriesByRemoteID` endpoint (XML, unauthenticated).
pub struct TvdbClient {
    client: reqwest::Client,
}

impl TvdbClient {
    pub fn new() -> Self {
        Self {
            client: crate::http_client(),
        }
    }
}

impl Default for TvdbClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RemoteIdLookup for TvdbClient {
    async fn series_ids_by_imdb(&self, imdb_id: &str) -> Result<Vec<u64>, MetadataError> {
        let url = format!("{BASE_URL}/GetSeriesByRemoteID.php");
        debug!(imdb_id, "TVDB remote id lookup");

        let resp = self
            .client
            .get(&url)
            .query(&[("imdbid", imdb_id)])
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "TVDB returned {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;
        parse_series_ids(&body)
    }
}

/// Extract series IDs from a `GetSeriesByRemoteID` XML payload.
///
/// Each entry contributes its `seriesid`, or its `id` when that is missing.
fn parse_series_ids(body: &str) -> Result<Vec<u64>, MetadataError> {
    let response: RemoteIdResponse = quick_xml::de::from_str(body)?;
    Ok(response
        .series
        .iter()
        .filter_map(|series| {
            let parse = |raw: &Option<String>| raw.as_deref()?.trim().parse::<u64>().ok();
            parse(&series.seriesid).or_else(|| parse(&series.id))
        })
        .collect())
}

/// Resolve the TVDB ID for a title, looking it up by IMDb ID when unknown.
///
/// Several matches resolve to the numerically smallest ID, which is the
/// oldest entry when TVDB carries duplicates.
pub async fn resolve_tvdb_id(
    lookup: &dyn RemoteIdLookup,
    mapping: &MappingInfo,
) -> Result<String, MetadataError> {
    if let Some(tvdb_id) = mapping.tvdb() {
        return Ok(tvdb_id.to_string());
    }

    let imdb_id = mapping.imdb().ok_or(MetadataError::NotFound)?;
    let candidates = lookup.series_ids_by_imdb(imdb_id).await?;
    let tvdb_id = candidates
        .into_iter()
        .filter(|id| *id != 0)
        .min()
        .ok_or(MetadataError::NotFound)?;

    debug!(imdb_id, tvdb_id, "resolved TVDB id");
    Ok(tvdb_id.to_string())
}
