//! Best-effort enrichment of newly created songs.
//!
//! Creating a song enqueues an [`EnrichmentJob`]. The [`EnrichmentWorker`]
//! looks the song up in a [`MetadataSource`](crate::metadata::MetadataSource)
//! and writes back whichever details it finds. Each job gets exactly one
//! attempt; failures are logged and counted, never reported to the caller
//! that created the song.

mod handle;
mod worker;

pub use handle::EnrichmentHandle;
pub use worker::{create_enrichment_system, enrich, EnrichmentOutcome, EnrichmentWorker};

use crate::metadata::SongDetails;
use crate::song::{date, FieldError, SongChanges};

/// A request to enrich one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentJob {
    pub song_id: i64,
    pub group: String,
    pub title: String,
}

/// Turn looked-up details into a catalog update.
///
/// Returns `Ok(None)` when the details carry no field at all. A release date
/// that is not `dd.mm.yyyy` rejects the whole set of details.
pub fn details_to_changes(details: SongDetails) -> Result<Option<SongChanges>, FieldError> {
    if details.is_empty() {
        return Ok(None);
    }

    let mut changes = SongChanges::new();

    if let Some(raw) = details.release_date {
        let release_date =
            date::parse_date(&raw).map_err(|_| FieldError::InvalidDate(raw.clone()))?;
        changes = changes.with_release_date(Some(release_date));
    }
    if let Some(text) = details.text {
        changes = changes.with_text(Some(text));
    }
    if let Some(link) = details.link {
        changes = changes.with_link(Some(link));
    }

    Ok(Some(changes))
}
