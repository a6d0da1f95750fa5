//! Kitsu catalog client and record normalization.
//!
//! Uses the JSON:API edge endpoint: https://kitsu.docs.apiary.io

use animeart_core::types::ContentType;
use serde::Serialize;
use tracing::debug;

use crate::MetadataError;

const BASE_URL: &str = "https://kitsu.io/api/edge";

/// One anime resource plus its `included` side-loads.
#[derive(Debug, Clone, Default)]
pub struct AnimeRecord {
    pub data: serde_json::Value,
    pub included: Vec<serde_json::Value>,
}

/// Source of single catalog records.
#[async_trait::async_trait]
pub trait AnimeCatalog: Send + Sync {
    async fn anime(&self, kitsu_id: &str) -> Result<AnimeRecord, MetadataError>;
}

pub struct KitsuClient {
    client: reqwest::Client,
}

impl KitsuClient {
    pub fn new() -> Self {
        Self {
            client: crate::http_client(),
        }
    }
}

impl Default for KitsuClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AnimeCatalog for KitsuClient {
    async fn anime(&self, kitsu_id: &str) -> Result<AnimeRecord, MetadataError> {
        let url = format!("{BASE_URL}/anime/{kitsu_id}");
        debug!(url = %url, "Kitsu request");

        let resp = self
            .client
            .get(&url)
            .query(&[("include", "genres,episodes")])
            .header(reqwest::header::ACCEPT, "application/vnd.api+json")
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "Kitsu returned {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))?;

        if !body["data"].is_object() {
            return Err(MetadataError::NotFound);
        }

        Ok(AnimeRecord {
            data: body["data"].clone(),
            included: body["included"].as_array().cloned().unwrap_or_default(),
        })
    }
}

/// Display-ready anime metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeMeta {
    pub id: String,
    pub kitsu_id: String,
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    pub anime_type: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub aliases: Vec<String>,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub description: Option<String>,
    pub release_info: Option<String>,
    pub year: Option<String>,
    pub imdb_rating: Option<f64>,
    pub status: Option<String>,
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trailers: Vec<Trailer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<Video>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trailer {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub released: Option<String>,
    pub season: u32,
    pub episode: u64,
}

/// Movie for movies and single-episode specials, series otherwise.
pub fn content_type(anime: &serde_json::Value) -> ContentType {
    let attrs = &anime["attributes"];
    match attrs["subtype"].as_str() {
        Some("movie") => ContentType::Movie,
        Some("special") if attrs["episodeCount"].as_u64().unwrap_or(0) > 1 => ContentType::Series,
        Some("special") => ContentType::Movie,
        _ => ContentType::Series,
    }
}

pub fn to_meta(record: &AnimeRecord) -> AnimeMeta {
    let anime = &record.data;
    let attrs = &anime["attributes"];
    let kitsu_id = str_field(&anime["id"]).unwrap_or_default();
    let content_type = content_type(anime);

    let titles = titles(attrs);
    let release_info = release_info(attrs);

    AnimeMeta {
        id: format!("kitsu:{kitsu_id}"),
        content_type: Some(content_type),
        anime_type: str_field(&attrs["subtype"]),
        name: titles.first().cloned(),
        slug: str_field(&attrs["slug"]),
        aliases: titles.iter().skip(1).cloned().collect(),
        genres: genres(anime, &record.included),
        poster: str_field(&attrs["posterImage"]["original"]),
        background: str_field(&attrs["coverImage"]["original"]),
        logo: None,
        description: str_field(&attrs["synopsis"]),
        year: release_info.clone(),
        release_info,
        imdb_rating: attrs["averageRating"]
            .as_str()
            .and_then(|r| r.parse::<f64>().ok())
            .map(|r| r.trunc() / 10.0),
        status: str_field(&attrs["status"]),
        runtime: attrs["episodeLength"].as_u64().map(|m| format!("{m} min")),
        trailers: str_field(&attrs["youtubeVideoId"])
            .map(|source| {
                vec![Trailer {
                    source,
                    kind: "Trailer".to_string(),
                }]
            })
            .unwrap_or_default(),
        videos: (content_type == ContentType::Series)
            .then(|| videos(&kitsu_id, attrs, &record.included)),
        kitsu_id,
    }
}

/// English titles first, then abbreviations; blanks and repeats removed.
fn titles(attrs: &serde_json::Value) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    let preferred = ["en_us", "en", "en_jp"]
        .iter()
        .filter_map(|key| str_field(&attrs["titles"][key]));
    let abbreviated = attrs["abbreviatedTitles"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(str_field);

    for title in preferred.chain(abbreviated) {
        if !titles.contains(&title) {
            titles.push(title);
        }
    }
    titles
}

fn genres(anime: &serde_json::Value, included: &[serde_json::Value]) -> Vec<String> {
    let Some(refs) = anime["relationships"]["genres"]["data"].as_array() else {
        return Vec::new();
    };
    refs.iter()
        .filter_map(|genre| {
            included
                .iter()
                .find(|inc| inc["type"] == "genres" && inc["id"] == genre["id"])
        })
        .filter_map(|genre| str_field(&genre["attributes"]["name"]))
        .collect()
}

/// `2006`, `2006-2008` across years, `2006-` while airing.
fn release_info(attrs: &serde_json::Value) -> Option<String> {
    let start = year_of(attrs["startDate"].as_str()?)?;
    match attrs["endDate"].as_str().and_then(year_of) {
        Some(end) if end != start => Some(format!("{start}-{end}")),
        Some(_) => Some(start),
        None if attrs["status"].as_str() == Some("current") => Some(format!("{start}-")),
        None => Some(start),
    }
}

fn year_of(date: &str) -> Option<String> {
    let digits: String = date.chars().take_while(|c| c.is_ascii_digit()).collect();
    (!digits.is_empty()).then_some(digits)
}

fn videos(kitsu_id: &str, attrs: &serde_json::Value, included: &[serde_json::Value]) -> Vec<Video> {
    let series_start = attrs["startDate"].as_str().and_then(rfc3339_date);

    included
        .iter()
        .filter(|inc| inc["type"] == "episodes")
        .filter_map(|ep| {
            let ep_attrs = &ep["attributes"];
            let number = ep_attrs["number"]
                .as_u64()
                .or_else(|| ep_attrs["relativeNumber"].as_u64())?;
            let titles = &ep_attrs["titles"];
            let title = str_field(&titles["en_us"])
                .or_else(|| str_field(&titles["en"]))
                .or_else(|| str_field(&titles["en_jp"]))
                .or_else(|| str_field(&ep_attrs["canonicalTitle"]))
                .unwrap_or_else(|| format!("Episode {number}"));
            Some(Video {
                id: format!("kitsu:{kitsu_id}:{number}"),
                title,
                released: ep_attrs["airdate"]
                    .as_str()
                    .and_then(rfc3339_date)
                    .or_else(|| series_start.clone()),
                season: 1,
                episode: number,
            })
        })
        .collect()
}

fn rfc3339_date(date: &str) -> Option<String> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

fn str_field(value: &serde_json::Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
