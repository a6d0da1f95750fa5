//! Image selection.
//!
//! Rules, per slot:
//! 1. Candidate lists are concatenated in order (HD logos before standard ones).
//! 2. A configured logo override for the title wins if the list contains it.
//! 3. Otherwise the first candidate with no language, `en` or `00` wins.
//! 4. Otherwise the first candidate.

use std::collections::HashMap;

use animeart_core::types::{AssetSlot, ImageCandidate, ImageResult, MappingInfo};
use tracing::debug;

use crate::provider::Gallery;

/// Languages accepted without falling back to provider order. `00` is
/// fanart.tv's marker for text-free artwork.
const PREFERRED_LANGUAGES: &[&str] = &["en", "00"];

/// Preferred logo candidate IDs, keyed by primary ID or IMDb ID.
#[derive(Debug, Clone, Default)]
pub struct LogoOverrides {
    by_title: HashMap<String, String>,
}

impl LogoOverrides {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            by_title: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Overrides for titles whose top-ranked fanart.tv logo is a poor fit.
    pub fn builtin() -> Self {
        Self::new([
            ("tt0098492", "28145"),
            ("892", "127311"),
            ("tt1118804", "29387"),
            ("3505", "29388"),
            ("tt0816407", "55556"),
            ("3579", "90919"),
            ("tt5346952", "98545"),
            ("13701", "98386"),
            ("tt6153026", "138529"),
            ("45228", "138478"),
            ("tt0473578", "32761"),
        ])
    }

    /// The primary ID entry takes precedence over the IMDb one.
    pub fn lookup(&self, primary_id: Option<&str>, imdb_id: Option<&str>) -> Option<&str> {
        primary_id
            .and_then(|id| self.by_title.get(id))
            .or_else(|| imdb_id.and_then(|id| self.by_title.get(id)))
            .map(String::as_str)
    }
}

/// Picks one URL per slot from provider candidate lists.
#[derive(Debug, Clone, Default)]
pub struct ImageSelector {
    overrides: LogoOverrides,
}

impl ImageSelector {
    pub fn new(overrides: LogoOverrides) -> Self {
        Self { overrides }
    }

    pub fn select_url(
        &self,
        primary_id: Option<&str>,
        imdb_id: Option<&str>,
        first: &[ImageCandidate],
        second: &[ImageCandidate],
    ) -> Option<String> {
        let merged: Vec<&ImageCandidate> = first.iter().chain(second.iter()).collect();

        if let Some(override_id) = self.overrides.lookup(primary_id, imdb_id) {
            if let Some(hit) = merged
                .iter()
                .find(|c| c.id.as_deref() == Some(override_id))
            {
                debug!(override_id, url = %hit.url, "logo override applied");
                return Some(hit.url.clone());
            }
        }

        preferred_candidate(&merged).map(|c| c.url.clone())
    }

    /// Select every slot from a gallery. Only logos consult the override table.
    pub fn select_images(
        &self,
        primary_id: &str,
        mapping: &MappingInfo,
        gallery: &Gallery,
    ) -> ImageResult {
        let mut images = ImageResult::default();
        images.set(
            AssetSlot::Logo,
            self.select_url(
                Some(primary_id),
                mapping.imdb(),
                &gallery.hd_logos,
                &gallery.logos,
            ),
        );
        images.set(
            AssetSlot::Poster,
            self.select_url(None, None, &gallery.posters, &[]),
        );
        images.set(
            AssetSlot::Background,
            self.select_url(None, None, &gallery.backgrounds, &[]),
        );
        images
    }
}

fn preferred_candidate<'a>(candidates: &[&'a ImageCandidate]) -> Option<&'a ImageCandidate> {
    candidates
        .iter()
        .find(|c| match c.language.as_deref() {
            None => true,
            Some(lang) => PREFERRED_LANGUAGES.contains(&lang),
        })
        .or_else(|| candidates.first())
        .copied()
}
