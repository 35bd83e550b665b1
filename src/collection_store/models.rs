//! Catalog entry models and their column encodings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl Artist {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

/// A catalog entry as delivered by the remote source, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogEntry {
    pub external_id: i64,
    pub title: String,
    pub artists: Vec<Artist>,
    /// `None` when the remote source reports 0 or nothing.
    pub year: Option<i32>,
    pub thumbnail_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub resource_url: String,
    /// ISO-8601 timestamp as reported by the remote source.
    pub date_added: Option<String>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
}

/// A cached catalog entry. `id` is assigned locally and stays the same
/// across upserts of the same `external_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub external_id: i64,
    pub title: String,
    pub artists: Vec<Artist>,
    pub year: Option<i32>,
    pub thumbnail_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub resource_url: String,
    pub date_added: Option<String>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
}

impl CatalogEntry {
    /// Artist names joined for display, e.g. "Miles Davis, John Coltrane".
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(crate) fn encode_artists(artists: &[Artist]) -> Result<String> {
    serde_json::to_string(artists).context("Failed to serialize artists")
}

/// Artists are stored as a JSON list of `{name}` objects. Rows written by
/// older builds may hold a plain display string instead, which is read back
/// as a single artist.
pub(crate) fn decode_artists(raw: Option<String>) -> Vec<Artist> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(&raw).unwrap_or_else(|_| vec![Artist::new(raw)])
}

/// Empty lists are stored as NULL.
pub(crate) fn encode_tags(tags: &[String]) -> Result<Option<String>> {
    if tags.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(tags)
        .map(Some)
        .context("Failed to serialize tags")
}

pub(crate) fn decode_tags(raw: Option<String>) -> Vec<String> {
    raw.and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub(crate) fn normalize_year(year: Option<i32>) -> Option<i32> {
    year.filter(|y| *y > 0)
}
