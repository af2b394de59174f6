//! Catalog operations as exposed to the delivery layer.

use std::sync::Arc;

use tracing::{debug, info};

use super::{Song, SongChanges, SongError, SongFilter, SongPage, SongStore};
use crate::enrichment::{EnrichmentHandle, EnrichmentJob};
use crate::pagination::PageRequest;
use crate::verses::{paginate_verses, VersePage};

/// Coordinates the song store, listing filters, pagination and enrichment.
#[derive(Clone)]
pub struct SongService {
    store: Arc<dyn SongStore>,
    enrichment: EnrichmentHandle,
}

impl SongService {
    pub fn new(store: Arc<dyn SongStore>, enrichment: EnrichmentHandle) -> Self {
        Self { store, enrichment }
    }

    pub fn store(&self) -> &Arc<dyn SongStore> {
        &self.store
    }

    /// Create a song and queue it for enrichment.
    ///
    /// Returns the bare record immediately; details arrive later, if at all.
    pub fn create(&self, group: &str, title: &str) -> Result<Song, SongError> {
        let song = self.store.create(group, title)?;
        info!(song_id = song.id, "Song created: {} - {}", group, title);

        self.enrichment.enqueue(EnrichmentJob {
            song_id: song.id,
            group: song.group.clone(),
            title: song.title.clone(),
        });

        Ok(song)
    }

    pub fn get(&self, id: i64) -> Result<Song, SongError> {
        self.store.get(id)
    }

    /// Apply a partial update and return the stored result.
    pub fn update(&self, id: i64, changes: SongChanges) -> Result<Song, SongError> {
        let mutation = changes.into_mutation()?;
        let song = self.store.update_fields(id, &mutation)?;
        info!(song_id = id, "Song updated");
        Ok(song)
    }

    pub fn delete(&self, id: i64) -> Result<(), SongError> {
        self.store.delete(id)?;
        info!(song_id = id, "Song deleted");
        Ok(())
    }

    /// List one page of songs matching the filter.
    ///
    /// The page query is skipped when the requested page is out of range or
    /// the matching set is empty.
    pub fn list(&self, filter: &SongFilter, request: PageRequest) -> Result<SongPage, SongError> {
        let predicate = filter.to_predicate();
        let total = self.store.count(&predicate)?;
        let window = request.window(total)?;

        let songs = if window.is_empty() {
            Vec::new()
        } else {
            self.store.list(&predicate, window.offset, request.limit)?
        };

        debug!(
            total,
            page = request.page,
            returned = songs.len(),
            "Listed songs"
        );

        Ok(SongPage {
            songs,
            total_pages: window.total_pages,
        })
    }

    /// Return one page of a song's verses.
    pub fn verses(&self, id: i64, request: PageRequest) -> Result<VersePage, SongError> {
        let text = self.store.get_text(id)?;
        Ok(paginate_verses(text.as_deref(), request)?)
    }
}
