//! Response payloads of the Discogs collection API.

use crate::collection_store::{Artist, NewCatalogEntry};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    #[serde(default)]
    pub items: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPage {
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub releases: Vec<CollectionRelease>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRelease {
    pub id: i64,
    pub date_added: Option<String>,
    pub basic_information: BasicInformation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasicInformation {
    #[serde(default)]
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub thumb: Option<String>,
    pub cover_image: Option<String>,
    pub resource_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub username: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<CollectionRelease> for NewCatalogEntry {
    fn from(release: CollectionRelease) -> Self {
        let info = release.basic_information;
        NewCatalogEntry {
            external_id: release.id,
            title: info.title,
            artists: info.artists.into_iter().map(|a| Artist::new(a.name)).collect(),
            year: info.year.filter(|y| *y > 0),
            thumbnail_url: non_empty(info.thumb),
            cover_image_url: non_empty(info.cover_image),
            resource_url: info.resource_url.unwrap_or_default(),
            date_added: release.date_added,
            genres: info.genres,
            styles: info.styles,
        }
    }
}
