use serde::{Deserialize, Serialize};

/// Content type hint supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// Image role resolved independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSlot {
    Logo,
    Poster,
    Background,
}

impl AssetSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Poster => "poster",
            Self::Background => "background",
        }
    }
}

impl std::fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate image from a provider, in the provider's own ranking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub id: Option<String>,
    pub url: String,
    pub language: Option<String>,
}

/// Resolved artwork for one title. Absent slots are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl ImageResult {
    pub fn get(&self, slot: AssetSlot) -> Option<&str> {
        match slot {
            AssetSlot::Logo => self.logo.as_deref(),
            AssetSlot::Poster => self.poster.as_deref(),
            AssetSlot::Background => self.background.as_deref(),
        }
    }

    /// Set a slot. Empty URLs leave the slot absent.
    pub fn set(&mut self, slot: AssetSlot, url: Option<String>) {
        let url = url.filter(|u| !u.is_empty());
        match slot {
            AssetSlot::Logo => self.logo = url,
            AssetSlot::Poster => self.poster = url,
            AssetSlot::Background => self.background = url,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.logo.is_none() && self.poster.is_none() && self.background.is_none()
    }
}

/// Known identifiers for one title across providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingInfo {
    pub primary_id: Option<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub tvdb_id: Option<String>,
}

impl MappingInfo {
    pub fn imdb(&self) -> Option<&str> {
        non_empty(&self.imdb_id)
    }

    pub fn tmdb(&self) -> Option<&str> {
        non_empty(&self.tmdb_id)
    }

    pub fn tvdb(&self) -> Option<&str> {
        non_empty(&self.tvdb_id)
    }

    /// Whether any provider identifier is usable.
    pub fn has_provider_id(&self) -> bool {
        self.imdb().is_some() || self.tmdb().is_some() || self.tvdb().is_some()
    }

    /// Cache key for resolved images.
    ///
    /// The primary ID when a TMDb or TVDB ID is known, otherwise the IMDb ID.
    pub fn cache_key(&self, primary_id: &str) -> Option<String> {
        if self.tmdb().is_some() || self.tvdb().is_some() {
            Some(primary_id.to_string())
        } else {
            self.imdb().map(str::to_string)
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
