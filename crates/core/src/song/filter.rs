//! Listing filters and the storage-agnostic predicate they compile to.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::field::{FieldError, FieldValue, SongField};

/// Sparse set of named constraints for a song listing.
///
/// Absent fields place no constraint on the result. Each field holds at most
/// one value; setting it again replaces the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    values: BTreeMap<SongField, FieldValue>,
}

impl SongFilter {
    /// Create an empty filter (matches every song).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by exact group name.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.values
            .insert(SongField::Group, FieldValue::Text(group.into()));
        self
    }

    /// Filter by exact title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.values
            .insert(SongField::Title, FieldValue::Text(title.into()));
        self
    }

    /// Filter by exact release date.
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.values
            .insert(SongField::ReleaseDate, FieldValue::Date(date));
        self
    }

    /// Filter by lyric content; every whitespace-separated word must appear.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.values.insert(SongField::Text, FieldValue::Text(text.into()));
        self
    }

    /// Filter by exact link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.values.insert(SongField::Link, FieldValue::Text(link.into()));
        self
    }

    /// Set a field from its raw wire representation.
    pub fn set(&mut self, field: SongField, raw: &str) -> Result<(), FieldError> {
        let value = field.parse_value(raw)?;
        self.values.insert(field, value);
        Ok(())
    }

    /// Get the value constraining `field`, if any.
    pub fn get(&self, field: SongField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Compile into a predicate.
    ///
    /// Text becomes one case-insensitive containment constraint per token;
    /// every other field becomes an equality constraint.
    pub fn to_predicate(&self) -> Predicate {
        let mut constraints = Vec::with_capacity(self.values.len());

        for (field, value) in &self.values {
            match (field, value) {
                (SongField::Text, FieldValue::Text(text)) => {
                    constraints.extend(text.split_whitespace().map(|token| {
                        Constraint::ContainsIgnoreCase {
                            field: SongField::Text,
                            token: token.to_string(),
                        }
                    }));
                }
                _ => constraints.push(Constraint::Equals {
                    field: *field,
                    value: value.clone(),
                }),
            }
        }

        Predicate { constraints }
    }
}

/// A single condition on a song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Field equals the value exactly.
    Equals { field: SongField, value: FieldValue },
    /// Field contains the token, ignoring case.
    ContainsIgnoreCase { field: SongField, token: String },
}

/// Conjunction of constraints. An empty predicate matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    constraints: Vec<Constraint>,
}

impl Predicate {
    /// Predicate matching every song.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_unconstrained(&self) -> bool {
        self.constraints.is_empty()
    }
}
