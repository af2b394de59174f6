//! Verse segmentation and paging over song lyrics.

use serde::Serialize;

use crate::pagination::{PageOutOfRange, PageRequest};

/// Verses are separated by one blank line.
pub const VERSE_DELIMITER: &str = "\n\n";

/// Split lyrics into verses in document order.
///
/// Segments are kept exactly as split, including empty ones produced by
/// leading, trailing or repeated delimiters. Missing or empty text has no
/// verses.
pub fn split_verses(text: Option<&str>) -> Vec<&str> {
    match text {
        Some(text) if !text.is_empty() => text.split(VERSE_DELIMITER).collect(),
        _ => Vec::new(),
    }
}

/// One page of verses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersePage {
    pub verses: Vec<String>,
    pub total_pages: u64,
}

/// Return the requested page of verses.
pub fn paginate_verses(
    text: Option<&str>,
    request: PageRequest,
) -> Result<VersePage, PageOutOfRange> {
    let verses = split_verses(text);
    let window = request.window(verses.len() as u64)?;

    let start = window.offset as usize;
    let end = start + window.len as usize;

    Ok(VersePage {
        verses: verses[start..end].iter().map(|v| v.to_string()).collect(),
        total_pages: window.total_pages,
    })
}
