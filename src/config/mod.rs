mod file_config;

pub use file_config::FileConfig;

use crate::remote::{DEFAULT_API_BASE_URL, MAX_PER_PAGE};
use crate::sync::DEFAULT_STALE_THRESHOLD_MS;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE: &str = "vinyl.db";
pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub username: Option<String>,
    pub discogs_token: Option<String>,
    pub api_base_url: String,
    pub request_timeout_sec: u64,
    pub stale_threshold_ms: i64,
    pub per_page: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            username: None,
            discogs_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
            stale_threshold_ms: DEFAULT_STALE_THRESHOLD_MS,
            per_page: MAX_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub username: Option<String>,
    pub discogs_token: Option<String>,
    pub api_base_url: String,
    pub request_timeout_sec: u64,
    pub stale_threshold_ms: i64,
    pub per_page: u32,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

        // A bare file name lives in the working directory
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let username = non_blank(file.username).or_else(|| non_blank(cli.username.clone()));
        let discogs_token =
            non_blank(file.discogs_token).or_else(|| non_blank(cli.discogs_token.clone()));

        let api_base_url = file
            .api_base_url
            .unwrap_or_else(|| cli.api_base_url.clone());
        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);

        let stale_threshold_ms = file.stale_threshold_ms.unwrap_or(cli.stale_threshold_ms);
        if stale_threshold_ms <= 0 {
            bail!(
                "stale_threshold_ms must be positive, got {}",
                stale_threshold_ms
            );
        }

        let per_page = file
            .per_page
            .unwrap_or(cli.per_page)
            .clamp(1, MAX_PER_PAGE);

        Ok(Self {
            db_path,
            username,
            discogs_token,
            api_base_url,
            request_timeout_sec,
            stale_threshold_ms,
            per_page,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
