//! Types for song records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Identity assigned by storage on creation.
    pub id: i64,
    /// Performing group.
    pub group: String,
    /// Song title.
    #[serde(rename = "song")]
    pub title: String,
    /// Release date, serialized as `dd.mm.yyyy`.
    #[serde(
        default,
        with = "date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<NaiveDate>,
    /// Lyrics, verses separated by blank lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// External link (e.g. a video URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Song {
    /// A freshly created song carrying only its identity, group and title.
    pub fn bare(id: i64, group: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            group: group.into(),
            title: title.into(),
            release_date: None,
            text: None,
            link: None,
        }
    }
}

/// One page of a song listing.
#[derive(Debug, Clone, Serialize)]
pub struct SongPage {
    pub songs: Vec<Song>,
    pub total_pages: u64,
}
