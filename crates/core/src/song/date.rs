//! The `dd.mm.yyyy` date wire format.

use chrono::NaiveDate;

/// chrono format string for the wire representation of release dates.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a `dd.mm.yyyy` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}

/// Format a date as `dd.mm.yyyy`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter for `Option<NaiveDate>` fields in `dd.mm.yyyy` form.
pub mod option {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&super::format_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| super::parse_date(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
