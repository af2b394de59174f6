//! Partial updates.
//!
//! A [`SongChanges`] records only the fields a caller supplied. Nullable
//! fields use `Option<Option<T>>`: the outer `None` means "leave unchanged",
//! `Some(None)` means "clear".

use chrono::NaiveDate;

use super::field::{FieldValue, SongField};
use super::SongError;

/// Sparse set of field overwrites for one song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongChanges {
    pub group: Option<String>,
    pub title: Option<String>,
    pub release_date: Option<Option<NaiveDate>>,
    pub text: Option<Option<String>>,
    pub link: Option<Option<String>>,
}

impl SongChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set (`Some`) or clear (`None`) the release date.
    pub fn with_release_date(mut self, date: Option<NaiveDate>) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Set (`Some`) or clear (`None`) the lyrics.
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = Some(text);
        self
    }

    /// Set (`Some`) or clear (`None`) the link.
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = Some(link);
        self
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.group.is_none()
            && self.title.is_none()
            && self.release_date.is_none()
            && self.text.is_none()
            && self.link.is_none()
    }

    /// Fields this change set touches.
    pub fn fields(&self) -> Vec<SongField> {
        self.assignments().into_iter().map(|a| a.field).collect()
    }

    /// Build the minimal mutation for storage.
    ///
    /// Fails with [`SongError::EmptyUpdate`] when nothing was supplied, so a
    /// write is never silently turned into a no-op.
    pub fn into_mutation(self) -> Result<Mutation, SongError> {
        let assignments = self.assignments();
        if assignments.is_empty() {
            return Err(SongError::EmptyUpdate);
        }
        Ok(Mutation { assignments })
    }

    fn assignments(&self) -> Vec<Assignment> {
        let mut assignments = Vec::new();

        if let Some(ref group) = self.group {
            assignments.push(Assignment::set(SongField::Group, group.as_str()));
        }
        if let Some(ref title) = self.title {
            assignments.push(Assignment::set(SongField::Title, title.as_str()));
        }
        if let Some(date) = self.release_date {
            assignments.push(Assignment {
                field: SongField::ReleaseDate,
                value: date.map(FieldValue::Date),
            });
        }
        if let Some(ref text) = self.text {
            assignments.push(Assignment {
                field: SongField::Text,
                value: text.clone().map(FieldValue::Text),
            });
        }
        if let Some(ref link) = self.link {
            assignments.push(Assignment {
                field: SongField::Link,
                value: link.clone().map(FieldValue::Text),
            });
        }

        assignments
    }
}

/// One column write. `value: None` stores NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: SongField,
    pub value: Option<FieldValue>,
}

impl Assignment {
    fn set(field: SongField, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            value: Some(value.into()),
        }
    }
}

/// Non-empty list of column writes, built from [`SongChanges`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    assignments: Vec<Assignment>,
}

impl Mutation {
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn touches(&self, field: SongField) -> bool {
        self.assignments.iter().any(|a| a.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_changes_rejected() {
        let result = SongChanges::new().into_mutation();
        assert!(matches!(result, Err(SongError::EmptyUpdate)));
    }

    #[test]
    fn test_only_supplied_fields_in_mutation() {
        let mutation = SongChanges::new()
            .with_text(Some("Verse one\n\nVerse two".to_string()))
            .into_mutation()
            .unwrap();

        assert_eq!(mutation.assignments().len(), 1);
        assert!(mutation.touches(SongField::Text));
        assert!(!mutation.touches(SongField::Group));
        assert!(!mutation.touches(SongField::Title));
        assert!(!mutation.touches(SongField::ReleaseDate));
        assert!(!mutation.touches(SongField::Link));
    }

    #[test]
    fn test_clear_is_distinct_from_omit() {
        let mutation = SongChanges::new()
            .with_link(None)
            .into_mutation()
            .unwrap();

        assert_eq!(
            mutation.assignments(),
            &[Assignment {
                field: SongField::Link,
                value: None,
            }]
        );
    }

    #[test]
    fn test_empty_string_still_overwrites() {
        let mutation = SongChanges::new()
            .with_text(Some(String::new()))
            .into_mutation()
            .unwrap();

        assert_eq!(
            mutation.assignments()[0].value,
            Some(FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn test_all_fields() {
        let changes = SongChanges::new()
            .with_group("Muse")
            .with_title("Uprising")
            .with_release_date(NaiveDate::from_ymd_opt(2009, 9, 7))
            .with_text(Some("Paranoia is in bloom".to_string()))
            .with_link(Some("https://example.com/uprising".to_string()));

        assert!(!changes.is_empty());
        assert_eq!(changes.fields(), SongField::ALL.to_vec());
        assert_eq!(changes.into_mutation().unwrap().assignments().len(), 5);
    }
}
