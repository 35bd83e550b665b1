use crate::collection_store::NewCatalogEntry;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to the remote catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No access token found")]
    MissingCredentials,

    #[error("Request to {url} failed with status: {status}")]
    Http { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Source of a user's full remote collection.
#[async_trait]
pub trait CollectionFetcher: Send + Sync {
    /// Returns every entry of `username`'s collection, all pages concatenated.
    async fn fetch_user_collection(
        &self,
        username: &str,
    ) -> Result<Vec<NewCatalogEntry>, FetchError>;
}
