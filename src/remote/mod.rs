mod auth;
mod discogs_client;
pub mod discogs_types;
mod fetcher;

pub use auth::{AuthProvider, TokenAuth};
pub use discogs_client::{DiscogsClient, DEFAULT_API_BASE_URL, MAX_PER_PAGE};
pub use fetcher::{CollectionFetcher, FetchError};
