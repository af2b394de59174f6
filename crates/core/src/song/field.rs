//! The fixed set of song fields that can be filtered on or updated.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::date;

/// A song attribute addressable by name.
///
/// Wire names match the JSON representation of [`super::Song`]; the title is
/// exposed as `song` for compatibility with existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongField {
    Group,
    #[serde(rename = "song")]
    Title,
    ReleaseDate,
    Text,
    Link,
}

impl SongField {
    /// All fields, in column order.
    pub const ALL: [SongField; 5] = [
        SongField::Group,
        SongField::Title,
        SongField::ReleaseDate,
        SongField::Text,
        SongField::Link,
    ];

    /// Name used in query strings and JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            SongField::Group => "group",
            SongField::Title => "song",
            SongField::ReleaseDate => "release_date",
            SongField::Text => "text",
            SongField::Link => "link",
        }
    }

    /// Storage column backing this field.
    pub fn column(&self) -> &'static str {
        match self {
            SongField::Group => "group_name",
            SongField::Title => "title",
            SongField::ReleaseDate => "release_date",
            SongField::Text => "text",
            SongField::Link => "link",
        }
    }

    /// Whether the field may be cleared (set to no value).
    pub fn is_nullable(&self) -> bool {
        !matches!(self, SongField::Group | SongField::Title)
    }

    /// Parse a raw wire value into the typed value this field stores.
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue, FieldError> {
        match self {
            SongField::ReleaseDate => date::parse_date(raw)
                .map(FieldValue::Date)
                .map_err(|_| FieldError::InvalidDate(raw.to_string())),
            _ => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for SongField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SongField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SongField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// A typed value for a [`SongField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// Errors raised when resolving field names or values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Unknown field: {0} (expected one of group, song, release_date, text, link)")]
    UnknownField(String),

    #[error("Invalid date '{0}', expected dd.mm.yyyy")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trips_through_wire_name() {
        for field in SongField::ALL {
            assert_eq!(field.as_str().parse::<SongField>().unwrap(), field);
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = "artist".parse::<SongField>().unwrap_err();
        assert_eq!(err, FieldError::UnknownField("artist".to_string()));
    }

    #[test]
    fn test_title_uses_song_wire_name() {
        assert_eq!(SongField::Title.as_str(), "song");
        assert_eq!(SongField::Title.column(), "title");
        assert_eq!(
            serde_json::to_string(&SongField::Title).unwrap(),
            "\"song\""
        );
    }

    #[test]
    fn test_parse_value_release_date() {
        let value = SongField::ReleaseDate.parse_value("16.07.2006").unwrap();
        assert_eq!(
            value,
            FieldValue::Date(NaiveDate::from_ymd_opt(2006, 7, 16).unwrap())
        );

        let err = SongField::ReleaseDate.parse_value("2006-07-16").unwrap_err();
        assert!(matches!(err, FieldError::InvalidDate(_)));
    }

    #[test]
    fn test_only_optional_fields_are_nullable() {
        assert!(!SongField::Group.is_nullable());
        assert!(!SongField::Title.is_nullable());
        assert!(SongField::ReleaseDate.is_nullable());
        assert!(SongField::Text.is_nullable());
        assert!(SongField::Link.is_nullable());
    }
}
