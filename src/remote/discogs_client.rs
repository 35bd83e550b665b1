//! HTTP client for the Discogs collection API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::auth::AuthProvider;
use super::discogs_types::{CollectionPage, Identity};
use super::fetcher::{CollectionFetcher, FetchError};
use crate::collection_store::NewCatalogEntry;

pub const DEFAULT_API_BASE_URL: &str = "https://api.discogs.com";
pub const MAX_PER_PAGE: u32 = 100;

const USER_AGENT: &str = concat!("vinyl-cache/", env!("CARGO_PKG_VERSION"));

/// Client for the Discogs REST API.
///
/// Every request carries the token from the configured [`AuthProvider`]; a
/// missing token fails before anything is sent.
#[derive(Clone)]
pub struct DiscogsClient {
    client: Client,
    base_url: String,
    per_page: u32,
    auth: Arc<dyn AuthProvider>,
}

impl DiscogsClient {
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://api.discogs.com"
    /// * `timeout_secs` - Request timeout in seconds
    /// * `per_page` - Collection page size, clamped to 1..=100
    pub fn new(
        base_url: String,
        timeout_secs: u64,
        per_page: u32,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorization_header(&self) -> Result<String, FetchError> {
        let token = self
            .auth
            .access_token()
            .ok_or(FetchError::MissingCredentials)?;
        Ok(format!("Discogs token={}", token))
    }

    fn collection_url(&self, username: &str) -> String {
        format!(
            "{}/users/{}/collection/folders/0/releases",
            self.base_url,
            urlencoding::encode(username)
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let authorization = self.authorization_header()?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Fetches a single 1-based page of `username`'s collection.
    pub async fn fetch_collection_page(
        &self,
        username: &str,
        page: u32,
    ) -> Result<CollectionPage, FetchError> {
        let url = self.collection_url(username);
        self.get_json(
            &url,
            &[
                ("page", page.to_string()),
                ("per_page", self.per_page.to_string()),
            ],
        )
        .await
    }

    /// Username the configured token belongs to.
    pub async fn fetch_identity(&self) -> Result<String, FetchError> {
        let url = format!("{}/oauth/identity", self.base_url);
        let identity: Identity = self.get_json(&url, &[]).await?;
        Ok(identity.username)
    }
}

#[async_trait]
impl CollectionFetcher for DiscogsClient {
    async fn fetch_user_collection(
        &self,
        username: &str,
    ) -> Result<Vec<NewCatalogEntry>, FetchError> {
        let mut entries = Vec::new();
        let mut page = 1;
        loop {
            let response = self.fetch_collection_page(username, page).await?;
            let total_pages = response.pagination.as_ref().map_or(1, |p| p.pages);
            debug!(
                "Fetched collection page {}/{} for {} ({} releases)",
                page,
                total_pages,
                username,
                response.releases.len()
            );
            entries.extend(response.releases.into_iter().map(NewCatalogEntry::from));

            if page >= total_pages {
                break;
            }
            page += 1;
        }
        info!("Fetched {} releases for {}", entries.len(), username);
        Ok(entries)
    }
}
