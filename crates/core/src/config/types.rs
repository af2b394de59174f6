use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub liveness: LivenessConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("songbook.db")
}

/// Metadata service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Base URL; lookups go to `{url}/info`
    pub url: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
}

fn default_metadata_timeout() -> u64 {
    10
}

/// Listing limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    /// Largest `limit` a caller may request
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
    /// Songs per page when the caller gives no limit
    #[serde(default = "default_songs_limit")]
    pub default_songs_limit: u32,
    /// Verses per page when the caller gives no limit
    #[serde(default = "default_verse_limit")]
    pub default_verse_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
            default_songs_limit: default_songs_limit(),
            default_verse_limit: default_verse_limit(),
        }
    }
}

fn default_max_limit() -> u32 {
    100
}

fn default_songs_limit() -> u32 {
    10
}

fn default_verse_limit() -> u32 {
    2
}

/// Enrichment queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            queue_size: default_queue_size(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_queue_size() -> usize {
    256
}

fn default_max_concurrent() -> usize {
    4
}

/// Store liveness probe configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LivenessConfig {
    #[serde(default = "default_liveness_interval")]
    pub interval_secs: u64,
    /// Consecutive failed pings before the server shuts down
    #[serde(default = "default_max_failures")]
    pub max_failures: u32,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_liveness_interval(),
            max_failures: default_max_failures(),
        }
    }
}

fn default_liveness_interval() -> u64 {
    10
}

fn default_max_failures() -> u32 {
    10
}

/// Config for API responses.
///
/// Only the metadata host is shown; any credentials or path in its URL are
/// left out.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub metadata: SanitizedMetadataConfig,
    pub pagination: PaginationConfig,
    pub enrichment: EnrichmentConfig,
    pub liveness: LivenessConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMetadataConfig {
    pub host: Option<String>,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            metadata: SanitizedMetadataConfig {
                host: reqwest::Url::parse(&config.metadata.url)
                    .ok()
                    .and_then(|url| url.host_str().map(String::from)),
                timeout_secs: config.metadata.timeout_secs,
            },
            pagination: config.pagination.clone(),
            enrichment: config.enrichment.clone(),
            liveness: config.liveness.clone(),
        }
    }
}
