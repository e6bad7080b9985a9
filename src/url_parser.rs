//! Folder URL parser for the `--folder` configuration value.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DriveError, Result};

/// Regex patterns for Google Drive folder URLs.
static FOLDER_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://drive\.google\.com/drive/(?:u/\d+/)?folders/([a-zA-Z0-9_-]+)")
        .expect("Invalid folder URL regex")
});

static OPEN_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://drive\.google\.com/open\?id=([a-zA-Z0-9_-]+)")
        .expect("Invalid open URL regex")
});

/// Valid Google Drive ID pattern (alphanumeric, underscore, hyphen).
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Extract a Google Drive folder ID from a URL or validate a raw ID.
///
/// Supports the following formats:
/// - `https://drive.google.com/drive/folders/<ID>`
/// - `https://drive.google.com/drive/u/0/folders/<ID>`
/// - `https://drive.google.com/open?id=<ID>`
/// - Raw ID string
///
/// # Examples
///
/// ```
/// use drivecast::url_parser::extract_folder_id;
///
/// let id = extract_folder_id("https://drive.google.com/drive/folders/1abc123").unwrap();
/// assert_eq!(id, "1abc123");
///
/// let id = extract_folder_id("1abc123").unwrap();
/// assert_eq!(id, "1abc123");
/// ```
pub fn extract_folder_id(url_or_id: &str) -> Result<String> {
    let trimmed = url_or_id.trim();

    // Try folder URL pattern
    if let Some(captures) = FOLDER_URL_REGEX.captures(trimmed) {
        if let Some(id) = captures.get(1) {
            return Ok(id.as_str().to_string());
        }
    }

    // Try open URL pattern
    if let Some(captures) = OPEN_URL_REGEX.captures(trimmed) {
        if let Some(id) = captures.get(1) {
            return Ok(id.as_str().to_string());
        }
    }

    // Check if it's a raw ID
    if ID_REGEX.is_match(trimmed) && !trimmed.is_empty() {
        return Ok(trimmed.to_string());
    }

    Err(DriveError::InvalidFolder(url_or_id.to_string()))
}
