//! HTTP client for the metadata service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use crate::config::MetadataConfig;
use crate::metrics;

use super::{MetadataError, MetadataSource, SongDetails};

/// Metadata source backed by `GET {url}/info?group=..&song=..`.
pub struct HttpMetadataSource {
    client: Client,
    base_url: String,
}

impl HttpMetadataSource {
    /// Create a new client from configuration.
    pub fn new(config: &MetadataConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .user_agent(format!("songbook/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, group: &str, title: &str) -> Result<SongDetails, MetadataError> {
        let url = format!("{}/info", self.base_url);

        debug!("Metadata lookup: group='{}', song='{}'", group, title);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[("group", group), ("song", title)])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<SongDetails>()
            .await
            .map_err(|e| MetadataError::Parse(format!("Failed to parse details: {}", e)))
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn lookup(&self, group: &str, title: &str) -> Result<SongDetails, MetadataError> {
        let start = Instant::now();
        let result = self.fetch(group, title).await;

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::METADATA_REQUESTS
            .with_label_values(&[status])
            .inc();
        metrics::METADATA_DURATION
            .with_label_values(&[status])
            .observe(start.elapsed().as_secs_f64());

        result
    }
}
