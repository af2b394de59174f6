//! Request validation.
//!
//! Everything here is a plain function of its input; handlers call them
//! before touching the catalog.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use songbook_core::song::date;
use songbook_core::{PageRequest, SongChanges, SongField, SongFilter};
use thiserror::Error;

/// Longest accepted group or song name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Longest accepted lyrics, in characters.
pub const MAX_TEXT_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Parse a song id path segment. Ids are positive integers.
pub fn parse_id(raw: &str) -> Result<i64, ValidationError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::new(format!(
            "id must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// Build a page request from `page` and `limit` query parameters.
///
/// Missing `page` means 1; missing `limit` means `default_limit`.
pub fn page_request(
    params: &HashMap<String, String>,
    default_limit: u32,
    max_limit: u32,
) -> Result<PageRequest, ValidationError> {
    let page = match params.get("page") {
        None => 1,
        Some(raw) => match raw.parse::<u32>() {
            Ok(page) if page >= 1 => page,
            _ => {
                return Err(ValidationError::new(
                    "page must be a positive integer",
                ))
            }
        },
    };

    let limit = match params.get("limit") {
        None => default_limit,
        Some(raw) => match raw.parse::<u32>() {
            Ok(limit) if (1..=max_limit).contains(&limit) => limit,
            _ => {
                return Err(ValidationError(format!(
                    "limit must be a positive integer no greater than {}",
                    max_limit
                )))
            }
        },
    };

    Ok(PageRequest::new(page, limit))
}

/// Build a listing filter from query parameters.
///
/// Keys that are not song fields are ignored. A song field key that is
/// present must carry a valid, non-empty value.
pub fn song_filter(params: &HashMap<String, String>) -> Result<SongFilter, ValidationError> {
    let mut filter = SongFilter::new();

    for field in SongField::ALL {
        let Some(raw) = params.get(field.as_str()) else {
            continue;
        };

        check_field(field, raw)?;
        filter
            .set(field, raw)
            .map_err(|e| ValidationError::new(e.to_string()))?;
    }

    Ok(filter)
}

fn check_field(field: SongField, value: &str) -> Result<(), ValidationError> {
    match field {
        SongField::Group | SongField::Title => check_length(field, value, MAX_NAME_CHARS),
        SongField::Text => check_length(field, value, MAX_TEXT_CHARS),
        SongField::ReleaseDate => date::parse_date(value).map(|_| ()).map_err(|_| {
            ValidationError::new(format!(
                "{} must be a valid date in the format dd.mm.yyyy",
                field
            ))
        }),
        SongField::Link => match reqwest::Url::parse(value) {
            Ok(_) => Ok(()),
            Err(_) => Err(ValidationError::new(format!(
                "{} must be a valid absolute URL",
                field
            ))),
        },
    }
}

fn check_length(field: SongField, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(ValidationError::new(format!(
            "{} must have between 1 and {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Request body for creating a song.
#[derive(Debug, Deserialize)]
pub struct CreateSongBody {
    pub group: String,
    pub song: String,
}

impl CreateSongBody {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_field(SongField::Group, &self.group)?;
        check_field(SongField::Title, &self.song)
    }
}

/// Request body for a partial update.
///
/// A missing key leaves the field unchanged. `null` clears a nullable field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSongBody {
    #[serde(default, deserialize_with = "present")]
    pub group: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub song: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub release_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub link: Option<Option<String>>,
}

/// Marks a key as present, keeping an explicit `null` as `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateSongBody {
    /// Validate supplied values and convert them into catalog changes.
    pub fn into_changes(self) -> Result<SongChanges, ValidationError> {
        let mut changes = SongChanges::new();

        if let Some(group) = self.group {
            let group = required(SongField::Group, group)?;
            check_field(SongField::Group, &group)?;
            changes = changes.with_group(group);
        }
        if let Some(song) = self.song {
            let song = required(SongField::Title, song)?;
            check_field(SongField::Title, &song)?;
            changes = changes.with_title(song);
        }
        if let Some(release_date) = self.release_date {
            let parsed = match release_date {
                Some(raw) => Some(date::parse_date(&raw).map_err(|_| {
                    ValidationError::new(
                        "release_date must be a valid date in the format dd.mm.yyyy",
                    )
                })?),
                None => None,
            };
            changes = changes.with_release_date(parsed);
        }
        if let Some(text) = self.text {
            if let Some(ref value) = text {
                check_field(SongField::Text, value)?;
            }
            changes = changes.with_text(text);
        }
        if let Some(link) = self.link {
            if let Some(ref value) = link {
                check_field(SongField::Link, value)?;
            }
            changes = changes.with_link(link);
        }

        Ok(changes)
    }
}

fn required(field: SongField, value: Option<String>) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::new(format!("{} cannot be null", field)))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use songbook_core::FieldValue;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn test_page_request_defaults() {
        let request = page_request(&params(&[]), 10, 100).unwrap();
        assert_eq!(request, PageRequest::new(1, 10));
    }

    #[test]
    fn test_page_request_explicit() {
        let request = page_request(&params(&[("page", "3"), ("limit", "25")]), 10, 100).unwrap();
        assert_eq!(request, PageRequest::new(3, 25));
    }

    #[test]
    fn test_page_request_rejects_bad_values() {
        assert!(page_request(&params(&[("page", "0")]), 10, 100).is_err());
        assert!(page_request(&params(&[("page", "x")]), 10, 100).is_err());
        assert!(page_request(&params(&[("limit", "0")]), 10, 100).is_err());
        assert!(page_request(&params(&[("limit", "101")]), 10, 100).is_err());
        assert!(page_request(&params(&[("limit", "100")]), 10, 100).is_ok());
    }

    #[test]
    fn test_song_filter_from_params() {
        let filter = song_filter(&params(&[
            ("group", "Rammstein"),
            ("release_date", "17.05.2019"),
            ("page", "1"),
            ("sort", "ignored"),
        ]))
        .unwrap();

        assert_eq!(
            filter.get(SongField::Group),
            Some(&FieldValue::Text("Rammstein".to_string()))
        );
        assert_eq!(
            filter.get(SongField::ReleaseDate),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2019, 5, 17).unwrap()))
        );
        assert!(filter.get(SongField::Text).is_none());
    }

    #[test]
    fn test_song_filter_rejects_empty_and_invalid_values() {
        assert!(song_filter(&params(&[("group", "")])).is_err());
        assert!(song_filter(&params(&[("release_date", "2019-05-17")])).is_err());
        assert!(song_filter(&params(&[("link", "not a url")])).is_err());
        let long = "x".repeat(101);
        assert!(song_filter(&params(&[("song", long.as_str())])).is_err());
    }

    #[test]
    fn test_create_body_validation() {
        let body = CreateSongBody {
            group: "Rammstein".to_string(),
            song: "Weit Weg".to_string(),
        };
        assert!(body.validate().is_ok());

        let body = CreateSongBody {
            group: String::new(),
            song: "Weit Weg".to_string(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let body = CreateSongBody {
            group: "ü".repeat(100),
            song: "Weit Weg".to_string(),
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_update_body_distinguishes_null_from_missing() {
        let body: UpdateSongBody = serde_json::from_str(r#"{"link": null}"#).unwrap();
        let changes = body.into_changes().unwrap();

        assert_eq!(changes.link, Some(None));
        assert!(changes.text.is_none());
        assert!(changes.group.is_none());
    }

    #[test]
    fn test_update_body_parses_values() {
        let body: UpdateSongBody = serde_json::from_str(
            r#"{"song": "Sonne", "release_date": "08.01.2001", "text": "Eins\n\nZwei"}"#,
        )
        .unwrap();
        let changes = body.into_changes().unwrap();

        assert_eq!(changes.title.as_deref(), Some("Sonne"));
        assert_eq!(
            changes.release_date,
            Some(NaiveDate::from_ymd_opt(2001, 1, 8))
        );
        assert_eq!(changes.text, Some(Some("Eins\n\nZwei".to_string())));
    }

    #[test]
    fn test_update_body_rejects_invalid_values() {
        let cases = [
            r#"{"group": null}"#,
            r#"{"song": ""}"#,
            r#"{"release_date": "2001-01-08"}"#,
            r#"{"link": "example"}"#,
            r#"{"text": ""}"#,
        ];

        for case in cases {
            let body: UpdateSongBody = serde_json::from_str(case).unwrap();
            assert!(body.into_changes().is_err(), "accepted {}", case);
        }
    }

    #[test]
    fn test_update_body_rejects_unknown_keys() {
        let result: Result<UpdateSongBody, _> = serde_json::from_str(r#"{"artist": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_update_body_produces_empty_changes() {
        let body: UpdateSongBody = serde_json::from_str("{}").unwrap();
        assert!(body.into_changes().unwrap().is_empty());
    }
}
