//! Mock metadata source for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::metadata::{MetadataError, MetadataSource, SongDetails};

/// A recorded lookup for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedLookup {
    pub group: String,
    pub title: String,
    /// When the lookup was made.
    pub timestamp: Instant,
}

/// A failure the mock returns instead of details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    /// Non-200 answer from the service.
    Status(u16, String),
    /// Undecodable response body.
    Malformed(String),
}

impl MockFailure {
    fn to_error(&self) -> MetadataError {
        match self {
            MockFailure::Status(status, message) => MetadataError::Status {
                status: *status,
                message: message.clone(),
            },
            MockFailure::Malformed(message) => MetadataError::Parse(message.clone()),
        }
    }
}

/// Mock implementation of the MetadataSource trait.
///
/// Songs without configured details answer with a 404, like the real
/// service does for unknown songs.
///
/// # Example
///
/// ```rust,ignore
/// use songbook_core::testing::{fixtures, MockMetadataSource};
///
/// let source = MockMetadataSource::new();
/// source
///     .set_details("Rammstein", "Weit Weg", fixtures::song_details("17.05.2019"))
///     .await;
///
/// let details = source.lookup("Rammstein", "Weit Weg").await?;
/// assert_eq!(source.lookup_count().await, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockMetadataSource {
    details: Arc<RwLock<HashMap<(String, String), SongDetails>>>,
    lookups: Arc<RwLock<Vec<RecordedLookup>>>,
    failure: Arc<RwLock<Option<MockFailure>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the details returned for one song.
    pub async fn set_details(&self, group: &str, title: &str, details: SongDetails) {
        self.details
            .write()
            .await
            .insert((group.to_string(), title.to_string()), details);
    }

    /// Make every lookup fail until cleared.
    pub async fn set_failure(&self, failure: MockFailure) {
        *self.failure.write().await = Some(failure);
    }

    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    /// Delay every lookup by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded lookups.
    pub async fn recorded_lookups(&self) -> Vec<RecordedLookup> {
        self.lookups.read().await.clone()
    }

    /// Get the number of lookups performed.
    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }
}

#[async_trait]
impl MetadataSource for MockMetadataSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn lookup(&self, group: &str, title: &str) -> Result<SongDetails, MetadataError> {
        self.lookups.write().await.push(RecordedLookup {
            group: group.to_string(),
            title: title.to_string(),
            timestamp: Instant::now(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(failure) = self.failure.read().await.as_ref() {
            return Err(failure.to_error());
        }

        self.details
            .read()
            .await
            .get(&(group.to_string(), title.to_string()))
            .cloned()
            .ok_or_else(|| MetadataError::Status {
                status: 404,
                message: format!("no details for {} - {}", group, title),
            })
    }
}
