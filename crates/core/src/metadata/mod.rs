//! External song metadata lookup.
//!
//! The catalog only stores what callers submit. Release date, lyrics and
//! link are fetched afterwards from a separate metadata service through the
//! [`MetadataSource`] trait.

mod http;
mod types;

pub use http::HttpMetadataSource;
pub use types::SongDetails;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the metadata service.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed (connection, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-200 status.
    #[error("Metadata service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not valid details JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Source of song details keyed by group and title.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Name of this source, for logs.
    fn name(&self) -> &str;

    /// Look up details for one song.
    async fn lookup(&self, group: &str, title: &str) -> Result<SongDetails, MetadataError>;
}
