//! Song storage trait and error type.

use thiserror::Error;

use super::{Mutation, Predicate, Song};
use crate::pagination::PageOutOfRange;

/// Errors for song catalog operations.
#[derive(Debug, Error)]
pub enum SongError {
    #[error("Song not found: {0}")]
    NotFound(i64),

    #[error("Song already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    PageOutOfRange(#[from] PageOutOfRange),

    #[error("At least one field must be provided for update")]
    EmptyUpdate,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for SongError {
    fn from(e: rusqlite::Error) -> Self {
        SongError::Database(e.to_string())
    }
}

/// Trait for song storage backends.
///
/// (group, title) is unique across all songs; a write that would break this
/// fails with [`SongError::AlreadyExists`].
pub trait SongStore: Send + Sync {
    /// Insert a song with only group and title set.
    fn create(&self, group: &str, title: &str) -> Result<Song, SongError>;

    /// Get a song by ID.
    fn get(&self, id: i64) -> Result<Song, SongError>;

    /// Apply a mutation and return the song as stored afterwards.
    fn update_fields(&self, id: i64, mutation: &Mutation) -> Result<Song, SongError>;

    /// Permanently delete a song.
    fn delete(&self, id: i64) -> Result<(), SongError>;

    /// Count songs matching the predicate.
    fn count(&self, predicate: &Predicate) -> Result<u64, SongError>;

    /// List songs matching the predicate, ordered by ID.
    fn list(&self, predicate: &Predicate, offset: u64, limit: u32) -> Result<Vec<Song>, SongError>;

    /// Get the lyrics of a song (`None` when not set yet).
    fn get_text(&self, id: i64) -> Result<Option<String>, SongError>;

    /// Cheap read-only check that storage is reachable.
    fn ping(&self) -> Result<(), SongError>;
}
