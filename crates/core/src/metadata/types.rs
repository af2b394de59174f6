use serde::{Deserialize, Serialize};

/// Details returned by the metadata service. Any subset may be present.
///
/// The release date is kept as the raw `dd.mm.yyyy` string; it is parsed
/// when the details are turned into a catalog update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl SongDetails {
    /// True when the service returned none of the fields.
    pub fn is_empty(&self) -> bool {
        self.release_date.is_none() && self.text.is_none() && self.link.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_details() {
        let details: SongDetails =
            serde_json::from_str(r#"{"release_date": "17.05.2019", "link": "https://example.com"}"#)
                .unwrap();
        assert_eq!(details.release_date.as_deref(), Some("17.05.2019"));
        assert!(details.text.is_none());
        assert_eq!(details.link.as_deref(), Some("https://example.com"));
        assert!(!details.is_empty());
    }

    #[test]
    fn test_deserialize_empty_object() {
        let details: SongDetails = serde_json::from_str("{}").unwrap();
        assert!(details.is_empty());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let details: SongDetails =
            serde_json::from_str(r#"{"text": "A\n\nB", "genre": "metal"}"#).unwrap();
        assert_eq!(details.text.as_deref(), Some("A\n\nB"));
    }
}
