//! Testing utilities and mock implementations.
//!
//! Provides a mock [`MetadataSource`](crate::metadata::MetadataSource) so the
//! enrichment path can be exercised without a running metadata service.

mod mock_metadata_source;

pub use mock_metadata_source::{MockFailure, MockMetadataSource, RecordedLookup};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::metadata::SongDetails;

    /// Lyrics of three verses.
    pub const THREE_VERSES: &str = "Niemand kann das Bild beschreiben\nGegen seine Fensterscheibe\n\nDer Raum wird sich mit Mondlicht füllen\nLässt sie fallen, alle Hüllen\n\nWeit weg";

    /// Details with every field populated.
    pub fn song_details(release_date: &str) -> SongDetails {
        SongDetails {
            release_date: Some(release_date.to_string()),
            text: Some(THREE_VERSES.to_string()),
            link: Some("https://example.com/songs/weit-weg".to_string()),
        }
    }
}
